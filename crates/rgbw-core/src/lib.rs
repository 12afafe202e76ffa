//! Host-side types shared by the script session and the executable.
//!
//! Nothing in here touches the interpreter: values cross the boundary as
//! [`GuestValue`] and are rendered by [`write_report`].

pub mod state;
pub use state::ShaderState;

pub mod value;
pub use value::{format_rgbw, GuestKind, GuestValue};

pub mod report;
pub use report::{write_report, ResultEntry};

pub mod options;
pub use options::{HostOptions, InvokeFailurePolicy};
