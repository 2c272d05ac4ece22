//! In-app notification sink. Owned by the shell and lent to subsystems as a
//! capability; nothing in the crate reaches for a global.

use std::collections::VecDeque;

const TOAST_CAP: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    pub ts: String,
}

#[derive(Debug, Default)]
pub struct Toasts {
    entries: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>) {
        self.entries.push_back(Toast {
            kind,
            text: text.into(),
            ts: crate::model::now_ts(),
        });
        while self.entries.len() > TOAST_CAP {
            self.entries.pop_front();
        }
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Error, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Info, text);
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_and_bound() {
        let mut t = Toasts::default();
        for i in 0..40 {
            t.info(format!("n{}", i));
        }
        assert_eq!(t.len(), TOAST_CAP);
        assert_eq!(t.latest().unwrap().text, "n39");
        assert_eq!(t.iter().next().unwrap().text, "n8");
    }
}
