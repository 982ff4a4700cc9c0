pub mod play;
pub mod speed;
pub mod terminal;
pub mod train;
pub mod watch;

pub use play::PlayMode;
pub use speed::Speed;
pub use train::{TrainConfig, TrainMode};
pub use watch::WatchMode;
