use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, RwLock};

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::core::{
    ChannelConfig, Error, Result, MAX_PACKET_SIZE, STATUS_SIZE_MAX, STATUS_SIZE_MIN,
};
use crate::protocol::{decode_packet, FieldMap, FieldTag, FieldValue};

use super::{resolve, socket};

/// State shared between the receive loop and caller threads
struct Shared {
    /// Latest decoded snapshot per SSRC; written only by the receive loop
    cache: RwLock<HashMap<u32, FieldMap>>,
    /// SSRC allow-list; empty accepts all streams
    ssrc_filter: Vec<u32>,
}

impl Shared {
    /// Decodes one status datagram and replaces the cache entry for its SSRC.
    ///
    /// Every failure here is contained: a malformed or irrelevant datagram is
    /// dropped and the loop carries on.
    fn ingest(&self, data: &[u8]) {
        let fields = match decode_packet(data) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("dropping malformed status packet: {}", e);
                return;
            }
        };

        let ssrc = match fields.get(&FieldTag::OutputSsrc).and_then(FieldValue::as_u64) {
            Some(ssrc) => ssrc as u32,
            None => {
                warn!("status packet without OUTPUT_SSRC, discarding");
                return;
            }
        };

        if !self.ssrc_filter.is_empty() && !self.ssrc_filter.contains(&ssrc) {
            return;
        }

        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(ssrc, fields);
    }
}

/// Lifecycle of the receive loop
enum LoopState {
    /// Constructed, socket not yet joined
    Idle,
    /// Receive loop active on a background task
    Running {
        shutdown_tx: watch::Sender<bool>,
        handle: JoinHandle<()>,
    },
    /// Loop signaled to exit
    Stopped,
}

/// Inbound multicast receiver caching the latest telemetry per SSRC
pub struct StatusChannel {
    /// Channel configuration
    config: ChannelConfig,
    /// Resolved multicast group address
    group_ip: IpAddr,
    /// Cache and filter shared with the receive loop
    shared: Arc<Shared>,
    /// Current lifecycle state
    state: LoopState,
}

impl StatusChannel {
    /// Creates a new status channel for the configured multicast group.
    ///
    /// Fails if the group name cannot be resolved. The receive loop does not
    /// run until [`start`](Self::start) is called.
    pub async fn new(config: ChannelConfig) -> Result<Self> {
        let group_ip = resolve::resolve_group(&config.group).await?;

        let shared = Arc::new(Shared {
            cache: RwLock::new(HashMap::new()),
            ssrc_filter: config.ssrc_filter.clone(),
        });

        Ok(StatusChannel {
            config,
            group_ip,
            shared,
            state: LoopState::Idle,
        })
    }

    /// Joins the multicast group and starts the background receive loop.
    ///
    /// Valid exactly once; starting a running or stopped channel is an error.
    pub fn start(&mut self) -> Result<()> {
        if !matches!(self.state, LoopState::Idle) {
            return Err(Error::invalid_state("status channel already started"));
        }

        let group = match self.group_ip {
            IpAddr::V4(group) => group,
            IpAddr::V6(_) => {
                return Err(Error::invalid_state("IPv6 multicast groups are not supported"))
            }
        };

        let socket = socket::multicast_listener(group, self.config.status_port)?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let shared = Arc::clone(&self.shared);

        let handle = tokio::spawn(receive_loop(socket, shared, shutdown_rx));
        self.state = LoopState::Running { shutdown_tx, handle };

        Ok(())
    }

    /// Signals the receive loop to exit and waits up to the configured grace
    /// period for it to finish. Idempotent; a failed join is logged, not
    /// escalated.
    pub async fn stop(&mut self) {
        let prev = std::mem::replace(&mut self.state, LoopState::Stopped);
        if let LoopState::Running { shutdown_tx, handle } = prev {
            let _ = shutdown_tx.send(true);
            if timeout(self.config.stop_grace, handle).await.is_err() {
                warn!("status receive loop did not stop within grace period");
            }
        }
    }

    /// Returns the latest snapshot for the given SSRC, or `None` if nothing
    /// has been received for it yet
    pub fn status(&self, ssrc: u32) -> Option<FieldMap> {
        self.shared
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&ssrc)
            .cloned()
    }

    /// Returns the SSRCs currently present in the cache
    pub fn ssrcs(&self) -> Vec<u32> {
        self.shared
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect()
    }
}

/// Background receive loop: one datagram per iteration until shutdown.
///
/// The size heuristic separates status packets from the much larger spectrum
/// and IQ sample packets sharing the group; it is an approximate filter, not
/// a framing guarantee.
async fn receive_loop(socket: UdpSocket, shared: Arc<Shared>, mut shutdown_rx: watch::Receiver<bool>) {
    let mut buf = vec![0u8; MAX_PACKET_SIZE];

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, _addr)) => {
                    if len > STATUS_SIZE_MIN && len < STATUS_SIZE_MAX {
                        shared.ingest(&buf[..len]);
                    }
                }
                Err(e) => warn!("status socket receive fault: {}", e),
            }
        }
    }

    debug!("status receive loop exited");
}
