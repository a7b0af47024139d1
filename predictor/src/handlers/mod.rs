pub mod health;
pub mod predict;
pub mod unavailable;

pub use health::health_handler;
pub use predict::predict_handler;
pub use unavailable::unavailable_handler;
