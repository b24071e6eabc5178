//! Platform capability adapters. The session and relay cores depend only on
//! these traits; concrete OS integration lives behind them so the wire and
//! transfer logic stays platform-agnostic.

mod clipboard;
mod error;
mod filesystem;
mod input_injector;
mod public_address;
mod screen_capture;

pub use clipboard::{ClipboardAdapter, NullClipboard};
pub use error::{PlatformError, Result};
pub use filesystem::{DirEntry, FilesystemAdapter, NativeFilesystemAdapter, Stat};
pub use input_injector::{InputEvent, InputInjector, MouseButton, NullInputInjector};
pub use public_address::{OpenDnsProbe, PublicAddressProbe};
pub use screen_capture::{FrameBuffer, NullScreenCapture, ScreenCapture};
