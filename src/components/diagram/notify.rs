//! Outgoing notifications. Presentation (toasts, status bars) lives elsewhere.

use log::{info, warn};

/// Receiver of user-facing messages emitted by editor commands.
pub trait Notifier {
	fn notify_error(&self, message: &str);
	fn notify_info(&self, message: &str);
}

/// Sends everything to the `log` facade only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
	fn notify_error(&self, message: &str) {
		warn!("{message}");
	}

	fn notify_info(&self, message: &str) {
		info!("{message}");
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use std::cell::RefCell;

	use super::Notifier;

	#[derive(Clone, Debug, PartialEq)]
	pub(crate) enum Note {
		Error(String),
		Info(String),
	}

	#[derive(Default)]
	pub(crate) struct Recorder(pub RefCell<Vec<Note>>);

	impl Recorder {
		pub(crate) fn errors(&self) -> usize {
			self.0.borrow().iter().filter(|n| matches!(n, Note::Error(_))).count()
		}

		pub(crate) fn infos(&self) -> usize {
			self.0.borrow().iter().filter(|n| matches!(n, Note::Info(_))).count()
		}
	}

	impl Notifier for Recorder {
		fn notify_error(&self, message: &str) {
			self.0.borrow_mut().push(Note::Error(message.into()));
		}

		fn notify_info(&self, message: &str) {
			self.0.borrow_mut().push(Note::Info(message.into()));
		}
	}
}
