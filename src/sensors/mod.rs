//! Temperature sources and the aggregating [`ChannelSet`].
//!
//! The set of monitored channels is fixed: [`MONITORED_CHANNELS`] lists the
//! transceiver temperature channels that are bound once at startup.  Only
//! channels that actually resolve are kept; an empty set is legal and
//! leaves the daemon doing fault monitoring only.
//!
//! A channel that fails to read or parse contributes `0` to the maximum.
//! A broken sensor therefore never drives the fan up, and an all-broken
//! set maps to the 0 % band: failures lean toward quiet operation rather
//! than maximum cooling.  The fan-fault shutdown path is unaffected.

pub mod reading;

use core::fmt;

use heapless::Vec;
use log::{debug, error, warn};

use crate::app::ports::DeviceRegistry;
use reading::parse_reading;

/// Upper bound on bound channels; sized to the built-in table.
pub const MAX_CHANNELS: usize = 4;

/// One monitored temperature source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorChannel {
    /// Device `name` attribute.
    pub device: &'static str,
    /// Index N of the `tempN` channel.
    pub channel_index: u8,
    /// Channel attribute holding the reading.
    pub attribute: &'static str,
}

impl SensorChannel {
    /// Channel identifier as used by the registry (`temp0`, `temp1`, ...).
    pub fn channel_id(&self) -> heapless::String<8> {
        let mut id = heapless::String::new();
        // "temp" + at most three digits always fits.
        let _ = fmt::Write::write_fmt(&mut id, format_args!("temp{}", self.channel_index));
        id
    }
}

impl fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/temp{}/{}", self.device, self.channel_index, self.attribute)
    }
}

/// Transceiver die temperatures monitored on the board.
pub const MONITORED_CHANNELS: [SensorChannel; 2] = [
    SensorChannel {
        device: "adrv9009-phy",
        channel_index: 0,
        attribute: "input",
    },
    SensorChannel {
        device: "adrv9009-phy-b",
        channel_index: 0,
        attribute: "input",
    },
];

/// A channel that resolved at startup, paired with its registry handle.
#[derive(Debug, Clone)]
pub struct BoundChannel<C> {
    pub channel: SensorChannel,
    pub handle: C,
}

/// The bound temperature channels, in table order.
#[derive(Debug, Clone)]
pub struct ChannelSet<C> {
    channels: Vec<BoundChannel<C>, MAX_CHANNELS>,
}

impl<C> Default for ChannelSet<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C> ChannelSet<C> {
    /// A set with nothing bound (fault monitoring only).
    pub const fn empty() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Resolve every entry of `table` through `registry`.
    ///
    /// Entries whose device, channel or attribute is missing are logged
    /// and skipped; they are not an error.
    pub fn bind<R>(registry: &R, table: &[SensorChannel]) -> Self
    where
        R: DeviceRegistry<Channel = C>,
    {
        let mut set = Self::empty();

        for entry in table {
            let Some(device) = registry.find_device(entry.device) else {
                warn!("Could not find ({})", entry.device);
                continue;
            };

            let channel_id = entry.channel_id();
            let Some(handle) = registry.find_channel(&device, &channel_id) else {
                warn!("Dev ({}) does not contain chann ({})", entry.device, channel_id);
                continue;
            };

            if !registry.channel_has_attribute(&handle, entry.attribute) {
                warn!("Attr ({}) not found in chann ({})", entry.attribute, channel_id);
                continue;
            }

            if set
                .channels
                .push(BoundChannel {
                    channel: *entry,
                    handle,
                })
                .is_err()
            {
                warn!("Channel table full, ignoring ({})", entry);
                continue;
            }
            debug!("Adding device ({})", entry.device);
        }

        set
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundChannel<C>> {
        self.channels.iter()
    }

    /// Maximum reading over all bound channels, starting from 0.
    ///
    /// Read and parse failures are logged and count as 0 for that channel.
    pub fn sample_max<R>(&self, registry: &R) -> i64
    where
        R: DeviceRegistry<Channel = C>,
    {
        self.channels
            .iter()
            .map(|ch| read_channel(registry, ch))
            .fold(0, i64::max)
    }
}

fn read_channel<R: DeviceRegistry>(registry: &R, ch: &BoundChannel<R::Channel>) -> i64 {
    let text = match registry.read_channel_attribute(&ch.handle, ch.channel.attribute) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read attr {}: {}", ch.channel, e);
            return 0;
        }
    };

    parse_reading(&text).unwrap_or_else(|e| {
        error!("Failed to convert temp {}: {}", ch.channel, e);
        0
    })
}
