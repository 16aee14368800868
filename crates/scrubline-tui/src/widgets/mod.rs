mod marquee;
mod playback;
mod reveal;
mod status_bar;

pub use marquee::MarqueeWidget;
pub use playback::PlaybackWidget;
pub use reveal::RevealWidget;
pub use status_bar::StatusBarWidget;
