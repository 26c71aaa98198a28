//! Row-level callbacks.

use std::fmt;

/// Row interactions reported back to the embedding code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowEvent {
    Click,
    Edit,
    Delete,
}

impl fmt::Display for RowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RowEvent::Click => "click",
            RowEvent::Edit => "edit",
            RowEvent::Delete => "delete",
        })
    }
}

/// Callback invoked with the full row.
pub type RowCallback<R> = Box<dyn FnMut(&R) + Send>;

pub(crate) struct RowCallbacks<R> {
    click: Option<RowCallback<R>>,
    edit: Option<RowCallback<R>>,
    delete: Option<RowCallback<R>>,
}

impl<R> Default for RowCallbacks<R> {
    fn default() -> Self {
        Self {
            click: None,
            edit: None,
            delete: None,
        }
    }
}

impl<R> RowCallbacks<R> {
    pub(crate) fn set(&mut self, event: RowEvent, callback: RowCallback<R>) {
        *self.slot(event) = Some(callback);
    }

    /// Invokes the callback for `event`. Returns `false` if none is set.
    pub(crate) fn emit(&mut self, event: RowEvent, row: &R) -> bool {
        match self.slot(event) {
            Some(callback) => {
                callback(row);
                true
            }
            None => false,
        }
    }

    fn slot(&mut self, event: RowEvent) -> &mut Option<RowCallback<R>> {
        match event {
            RowEvent::Click => &mut self.click,
            RowEvent::Edit => &mut self.edit,
            RowEvent::Delete => &mut self.delete,
        }
    }
}

impl<R> fmt::Debug for RowCallbacks<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowCallbacks")
            .field("click", &self.click.is_some())
            .field("edit", &self.edit.is_some())
            .field("delete", &self.delete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_emit_only_registered() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut callbacks: RowCallbacks<u32> = RowCallbacks::default();
        callbacks.set(RowEvent::Edit, Box::new(move |row| sink.lock().unwrap().push(*row)));

        assert!(callbacks.emit(RowEvent::Edit, &7));
        assert!(!callbacks.emit(RowEvent::Click, &8));
        assert_eq!(*seen.lock().unwrap(), [7]);
    }
}
