//! Static field schema for the ka9q-radio metadata protocol
//!
//! Maps each one-byte field tag to its semantic name and wire-type category.
//! The table mirrors decode_status.c/dump.c from ka9q-radio; tag 0 is the
//! reserved end-of-list marker and is not part of the schema.

/// Wire-type category of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 64-bit big-endian IEEE754 double
    Double,
    /// 32-bit big-endian IEEE754 float
    Float,
    /// Big-endian unsigned integer, up to 8 bytes (single byte when the
    /// schema minimum length is 1)
    Uint,
    /// Boolean, transmitted as an unsigned integer, true iff nonzero
    Bool,
    /// UTF-8 string
    Text,
    /// Raw byte blob, passed through undecoded
    Blob,
    /// Network socket address: 4-byte IPv4 or 8-byte IPv6 address plus a
    /// 2-byte big-endian port
    Socket,
}

macro_rules! field_schema {
    ($(($name:ident = $tag:literal, $kind:ident, $min:literal),)*) => {
        /// Semantic field tags defined by the protocol
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum FieldTag {
            $($name = $tag,)*
        }

        impl FieldTag {
            /// Looks up a wire tag in the schema; `None` for the EOL marker
            /// and for tags outside the populated range
            pub fn from_u8(tag: u8) -> Option<FieldTag> {
                match tag {
                    $($tag => Some(FieldTag::$name),)*
                    _ => None,
                }
            }

            /// Returns the wire-type category of this field
            pub fn kind(self) -> FieldKind {
                match self {
                    $(FieldTag::$name => FieldKind::$kind,)*
                }
            }

            /// Returns the minimum encoded length of this field
            pub fn min_len(self) -> usize {
                match self {
                    $(FieldTag::$name => $min,)*
                }
            }
        }
    };
}

field_schema! {
    (CommandTag = 1, Uint, 0),
    (CmdCnt = 2, Uint, 1),
    (GpsTime = 3, Uint, 0),
    (Description = 4, Text, 0),
    (StatusDestSocket = 5, Socket, 0),
    (SetOpts = 6, Uint, 0),
    (ClearOpts = 7, Uint, 0),
    (RtpTimesnap = 8, Uint, 0),
    (Unused4 = 9, Blob, 0),
    (InputSamprate = 10, Uint, 0),
    (Unused6 = 11, Blob, 0),
    (Unused7 = 12, Blob, 0),
    (InputSamples = 13, Uint, 0),
    (Unused8 = 14, Blob, 0),
    (Unused9 = 15, Blob, 0),
    (OutputDataSourceSocket = 16, Socket, 0),
    (OutputDataDestSocket = 17, Socket, 0),
    (OutputSsrc = 18, Uint, 0),
    (OutputTtl = 19, Uint, 0),
    (OutputSamprate = 20, Uint, 0),
    (OutputMetadataPackets = 21, Uint, 0),
    (OutputDataPackets = 22, Uint, 0),
    (OutputErrors = 23, Uint, 0),
    (Calibrate = 24, Double, 0),
    (LnaGain = 25, Uint, 0),
    (MixerGain = 26, Uint, 0),
    (IfGain = 27, Uint, 0),
    (DcIOffset = 28, Float, 0),
    (DcQOffset = 29, Float, 0),
    (IqImbalance = 30, Float, 0),
    (IqPhase = 31, Float, 0),
    (DirectConversion = 32, Bool, 0),
    (RadioFrequency = 33, Double, 0),
    (FirstLoFrequency = 34, Double, 0),
    (SecondLoFrequency = 35, Double, 0),
    (ShiftFrequency = 36, Double, 0),
    (DopplerFrequency = 37, Double, 0),
    (DopplerFrequencyRate = 38, Double, 0),
    (LowEdge = 39, Float, 0),
    (HighEdge = 40, Float, 0),
    (KaiserBeta = 41, Float, 0),
    (FilterBlocksize = 42, Uint, 0),
    (FilterFirLength = 43, Uint, 0),
    (Filter2 = 44, Uint, 0),
    (IfPower = 45, Float, 0),
    (BasebandPower = 46, Float, 0),
    (NoiseDensity = 47, Float, 0),
    (DemodType = 48, Uint, 0),
    (OutputChannels = 49, Uint, 0),
    (IndependentSideband = 50, Bool, 0),
    (PllEnable = 51, Bool, 0),
    (PllLock = 52, Bool, 0),
    (PllSquare = 53, Bool, 0),
    (PllPhase = 54, Float, 0),
    (PllBw = 55, Float, 0),
    (Envelope = 56, Bool, 0),
    (SnrSquelch = 57, Bool, 0),
    (PllSnr = 58, Float, 0),
    (FreqOffset = 59, Float, 0),
    (PeakDeviation = 60, Float, 0),
    (PlTone = 61, Float, 0),
    (AgcEnable = 62, Bool, 0),
    (Headroom = 63, Float, 0),
    (AgcHangtime = 64, Float, 0),
    (AgcRecoveryRate = 65, Float, 0),
    (FmSnr = 66, Float, 0),
    (AgcThreshold = 67, Float, 0),
    (Gain = 68, Float, 0),
    (OutputLevel = 69, Float, 0),
    (OutputSamples = 70, Uint, 0),
    (OpusBitRate = 71, Uint, 0),
    (MinPacket = 72, Uint, 0),
    (Filter2Blocksize = 73, Uint, 0),
    (Filter2FirLength = 74, Uint, 0),
    (Filter2KaiserBeta = 75, Float, 0),
    (Unused16 = 76, Blob, 0),
    (FilterDrops = 77, Uint, 0),
    (Lock = 78, Uint, 0),
    (Tp1 = 79, Float, 0),
    (Tp2 = 80, Float, 0),
    (GainStep = 81, Uint, 0),
    (AdBitsPerSample = 82, Uint, 0),
    (SquelchOpen = 83, Float, 0),
    (SquelchClose = 84, Float, 0),
    (Preset = 85, Text, 0),
    (DeemphTc = 86, Float, 0),
    (DeemphGain = 87, Float, 0),
    (ConverterOffset = 88, Float, 0),
    (PlDeviation = 89, Float, 0),
    (ThreshExtend = 90, Bool, 0),
    (Unused20 = 91, Blob, 0),
    (CoherentBinSpacing = 92, Uint, 0),
    (NoncoherentBinBw = 93, Float, 0),
    (BinCount = 94, Uint, 0),
    (Crossover = 95, Float, 0),
    (BinData = 96, Blob, 0),
    (RfAtten = 97, Float, 0),
    (RfGain = 98, Float, 0),
    (RfAgc = 99, Uint, 0),
    (FeLowEdge = 100, Float, 0),
    (FeHighEdge = 101, Float, 0),
    (FeIsReal = 102, Bool, 0),
    (BlocksSincePoll = 103, Uint, 0),
    (AdOver = 104, Uint, 0),
    (RtpPt = 105, Uint, 0),
    (StatusInterval = 106, Uint, 0),
    (OutputEncoding = 107, Uint, 0),
    (SamplesSinceOver = 108, Uint, 0),
    (PllWraps = 109, Uint, 0),
    (RfLevelCal = 110, Float, 0),
}
