//! Ripple Signals - standalone reactive values
//!
//! A signal is a read/write pair over one shared value. Writing notifies the
//! signal's subscribers synchronously. Signals do not participate in hook
//! ordering and can be used outside components.
//!
//! Server signals are additionally registered in a thread-local registry so
//! a server render can serialize their values for the client:
//!
//! ```
//! use ripple_signals::{collect_server_signals, create_server_signal, reset_server_signals};
//!
//! reset_server_signals();
//! let (user, _set_user) = create_server_signal("ada".to_string());
//!
//! let captured = collect_server_signals();
//! assert_eq!(captured[&user.id().to_string()], "ada");
//! ```

#![warn(missing_docs)]

pub mod server;
pub mod signal;

pub use server::{
	collect_server_signals, create_server_signal, reset_server_signals, server_signal_count,
};
pub use signal::{ReadSignal, SignalId, Subscription, WriteSignal, create_signal};
