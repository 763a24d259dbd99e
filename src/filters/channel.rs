//! Single-channel color isolation.
//!
//! Keeps one of the R, G, B channels and zeroes the other two, so a red
//! isolation turns `(r, g, b)` into `(r, 0, 0)`. Pure per-pixel map and
//! idempotent.

use std::fmt;
use std::str::FromStr;

use ndarray::Axis;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, FilterResult};

/// Color channel to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    R,
    G,
    B,
}

impl Channel {
    /// All channels in storage order.
    pub const ALL: [Channel; 3] = [Channel::R, Channel::G, Channel::B];

    /// Index of this channel within an RGB triple.
    pub fn index(self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
        }
    }
}

impl TryFrom<usize> for Channel {
    type Error = FilterError;

    fn try_from(index: usize) -> FilterResult<Self> {
        Channel::ALL
            .get(index)
            .copied()
            .ok_or_else(|| FilterError::ChannelOutOfRange(index.to_string()))
    }
}

impl FromStr for Channel {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Channel::R),
            "g" | "green" => Ok(Channel::G),
            "b" | "blue" => Ok(Channel::B),
            _ => Err(FilterError::ChannelOutOfRange(s.to_string())),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::R => f.write_str("R"),
            Channel::G => f.write_str("G"),
            Channel::B => f.write_str("B"),
        }
    }
}

/// Zero every channel except `channel`, in place.
pub fn isolate_channel(buffer: &mut PixelBuffer, channel: Channel) {
    let keep = channel.index();
    let mut view = buffer.view_mut();

    for (c, mut plane) in view.axis_iter_mut(Axis(2)).enumerate() {
        if c != keep {
            plane.fill(0);
        }
    }
}
