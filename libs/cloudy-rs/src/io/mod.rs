//! Interactions with the network (and, for transfers, the local disk).

pub mod network;
