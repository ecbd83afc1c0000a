use crate::Result;
use std::ops::{Index, IndexMut};

/// Channel selector for a [`Plane3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    X,
    Y,
    Z,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::X, Channel::Y, Channel::Z];

    pub fn index(self) -> usize {
        match self {
            Channel::X => 0,
            Channel::Y => 1,
            Channel::Z => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::X => "X",
            Channel::Y => "Y",
            Channel::Z => "Z",
        }
    }
}

/// Three independently stored channels (plane order), e.g. the X, Y and Z
/// planes of an image or one gradient field per plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane3<T> {
    channels: [T; 3],
}

impl<T> Plane3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self {
            channels: [x, y, z],
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.channels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().zip(self.channels.iter())
    }

    pub fn map<U, F>(&self, mut f: F) -> Plane3<U>
    where
        F: FnMut(Channel, &T) -> U,
    {
        Plane3::new(
            f(Channel::X, &self.channels[0]),
            f(Channel::Y, &self.channels[1]),
            f(Channel::Z, &self.channels[2]),
        )
    }

    /// Like [`Plane3::map`], stopping at the first channel that fails.
    pub fn try_map<U, F>(&self, mut f: F) -> Result<Plane3<U>>
    where
        F: FnMut(Channel, &T) -> Result<U>,
    {
        Ok(Plane3::new(
            f(Channel::X, &self.channels[0])?,
            f(Channel::Y, &self.channels[1])?,
            f(Channel::Z, &self.channels[2])?,
        ))
    }

    pub fn into_array(self) -> [T; 3] {
        self.channels
    }
}

impl<T> Index<Channel> for Plane3<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        &self.channels[channel.index()]
    }
}

impl<T> IndexMut<Channel> for Plane3<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.channels[channel.index()]
    }
}
