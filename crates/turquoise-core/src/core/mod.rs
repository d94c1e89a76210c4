pub mod box_entity;
pub mod geometry;
pub mod glide;
pub mod registry;
pub mod rng;
pub mod state;
pub mod time;
