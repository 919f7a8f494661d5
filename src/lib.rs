//! Procedural images and looping animations painted by randomly wired, untrained
//! coordinate networks.

pub mod a_funcs;
pub mod animation;
pub mod architecture;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod field;
pub mod initializer;
pub mod layers;
pub mod network;
pub mod observer;
pub mod painter;
pub mod render;
pub mod storage;

pub use a_funcs::Activation;
pub use animation::{AnimationEncoder, GifAnimation, PngFrames};
pub use architecture::RandomArchitecture;
pub use config::GenerationConfig;
pub use error::{PainterError, PainterResult};
pub use evaluator::{Chunking, Evaluator};
pub use network::Network;
pub use observer::{LogObserver, Observer};
pub use painter::{Animation, Painter, Painting, SharedPainter};
pub use render::PixelBuffer;
