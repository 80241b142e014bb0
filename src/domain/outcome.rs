//! A success value or a human readable failure message.
//!
//! `Outcome` carries expected, data dependent failures through the pipeline
//! (a malformed log line, an unreachable feed, an empty data set). Failures
//! that reflect misuse of the API are reported through [`MenuError`] instead.

use crate::utils::error::{MenuError, Result};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Value(T),
    Message(String),
}

impl<T> Outcome<T> {
    pub fn of(value: T) -> Self {
        Outcome::Value(value)
    }

    pub fn of_msg(message: impl Into<String>) -> Self {
        Outcome::Message(message.into())
    }

    /// `Value` if `value` is present, otherwise `Message(message)`.
    pub fn of_optional(value: Option<T>, message: impl Into<String>) -> Self {
        match value {
            Some(value) => Outcome::Value(value),
            None => Outcome::Message(message.into()),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_empty(&self) -> bool {
        !self.is_present()
    }

    pub fn get(&self) -> Result<&T> {
        match self {
            Outcome::Value(value) => Ok(value),
            Outcome::Message(_) => Err(MenuError::NoSuchElement("outcome holds a message")),
        }
    }

    pub fn get_message(&self) -> Result<&str> {
        match self {
            Outcome::Value(_) => Err(MenuError::NoSuchElement("outcome holds a value")),
            Outcome::Message(message) => Ok(message),
        }
    }

    pub fn or_else(self, default: T) -> T {
        match self {
            Outcome::Value(value) => value,
            Outcome::Message(_) => default,
        }
    }

    pub fn or_else_get(self, supplier: impl FnOnce() -> T) -> T {
        match self {
            Outcome::Value(value) => value,
            Outcome::Message(_) => supplier(),
        }
    }

    pub fn map<S>(self, f: impl FnOnce(T) -> S) -> Outcome<S> {
        match self {
            Outcome::Value(value) => Outcome::Value(f(value)),
            Outcome::Message(message) => Outcome::Message(message),
        }
    }

    pub fn flat_map<S>(self, f: impl FnOnce(T) -> Outcome<S>) -> Outcome<S> {
        match self {
            Outcome::Value(value) => f(value),
            Outcome::Message(message) => Outcome::Message(message),
        }
    }

    /// Hands the value to an effectful sink. Returns the held message if there
    /// is no value, `None` otherwise.
    pub fn consume(self, f: impl FnOnce(T)) -> Option<String> {
        match self {
            Outcome::Value(value) => {
                f(value);
                None
            }
            Outcome::Message(message) => Some(message),
        }
    }

    /// Like [`Outcome::consume`], but the sink may fail as well. Its error is
    /// reported through its `Display` text.
    pub fn try_to_consume<E: Display>(
        self,
        f: impl FnOnce(T) -> std::result::Result<(), E>,
    ) -> Option<String> {
        match self {
            Outcome::Value(value) => f(value).err().map(|e| e.to_string()),
            Outcome::Message(message) => Some(message),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Outcome::Value(value) => Ok(value),
            Outcome::Message(message) => Err(message),
        }
    }

    /// Combines all outcomes. Any message turns the whole result into a single
    /// message listing every failure, one per line; values are discarded then.
    pub fn sequence(outcomes: impl IntoIterator<Item = Outcome<T>>) -> Outcome<Vec<T>> {
        let mut values = Vec::new();
        let mut messages: Vec<String> = Vec::new();

        for outcome in outcomes {
            match outcome {
                Outcome::Value(value) => values.push(value),
                Outcome::Message(message) => messages.push(message),
            }
        }

        if messages.is_empty() {
            Outcome::Value(values)
        } else {
            Outcome::Message(messages.join("\n"))
        }
    }
}

impl<T> FromIterator<Outcome<T>> for Outcome<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        Outcome::sequence(iter)
    }
}

impl<T, E: Display> From<std::result::Result<T, E>> for Outcome<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(e) => Outcome::Message(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_variant_queries() {
        let value: Outcome<i32> = Outcome::of(3);
        let message: Outcome<i32> = Outcome::of_msg("nope");

        assert!(value.is_present());
        assert!(!value.is_empty());
        assert!(message.is_empty());
        assert_eq!(*value.get().unwrap(), 3);
        assert_eq!(message.get_message().unwrap(), "nope");
    }

    #[test]
    fn test_wrong_accessor_reports_no_such_element() {
        let value: Outcome<i32> = Outcome::of(3);
        let message: Outcome<i32> = Outcome::of_msg("nope");

        assert!(matches!(value.get_message(), Err(MenuError::NoSuchElement(_))));
        assert!(matches!(message.get(), Err(MenuError::NoSuchElement(_))));
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(Outcome::of(1).or_else(9), 1);
        assert_eq!(Outcome::<i32>::of_msg("x").or_else(9), 9);
        assert_eq!(Outcome::<i32>::of_msg("x").or_else_get(|| 7), 7);
        assert_eq!(Outcome::of(1).or_else_get(|| panic!("must not be called")), 1);
    }

    #[test]
    fn test_map_and_flat_map_short_circuit() {
        let doubled = Outcome::of(21).map(|v| v * 2);
        assert_eq!(doubled, Outcome::of(42));

        let failed: Outcome<i32> = Outcome::of_msg("broken");
        assert_eq!(failed.clone().map(|v| v * 2), Outcome::of_msg("broken"));
        assert_eq!(
            failed.flat_map(|v| Outcome::of(v + 1)),
            Outcome::of_msg("broken")
        );

        let chained: Outcome<i32> = Outcome::of(1).flat_map(|_| Outcome::of_msg("second step"));
        assert_eq!(chained, Outcome::of_msg("second step"));
    }

    #[test]
    fn test_of_optional() {
        assert_eq!(Outcome::of_optional(Some(5), "missing"), Outcome::of(5));
        assert_eq!(
            Outcome::<i32>::of_optional(None, "missing"),
            Outcome::of_msg("missing")
        );
    }

    #[test]
    fn test_consume() {
        let sink = RefCell::new(Vec::new());

        assert_eq!(Outcome::of(4).consume(|v| sink.borrow_mut().push(v)), None);
        assert_eq!(
            Outcome::<i32>::of_msg("bad").consume(|v| sink.borrow_mut().push(v)),
            Some("bad".to_string())
        );
        assert_eq!(*sink.borrow(), vec![4]);
    }

    #[test]
    fn test_try_to_consume() {
        let ok = Outcome::of(1).try_to_consume(|_| Ok::<(), String>(()));
        assert_eq!(ok, None);

        let sink_failed = Outcome::of(1).try_to_consume(|_| Err("disk full"));
        assert_eq!(sink_failed, Some("disk full".to_string()));

        let original = Outcome::<i32>::of_msg("fetch failed").try_to_consume(|_| Err("unused"));
        assert_eq!(original, Some("fetch failed".to_string()));
    }

    #[test]
    fn test_sequence_accumulates_all_messages() {
        let mixed = vec![
            Outcome::of(1),
            Outcome::of_msg("a"),
            Outcome::of(2),
            Outcome::of_msg("b"),
        ];
        assert_eq!(Outcome::sequence(mixed), Outcome::of_msg("a\nb"));

        let all_values = vec![Outcome::of(1), Outcome::of(2)];
        assert_eq!(Outcome::sequence(all_values), Outcome::of(vec![1, 2]));
    }

    #[test]
    fn test_sequence_of_nothing_is_an_empty_value() {
        let empty: Vec<Outcome<i32>> = Vec::new();
        assert_eq!(Outcome::sequence(empty), Outcome::of(vec![]));
    }

    #[test]
    fn test_collect_uses_sequence() {
        let collected: Outcome<Vec<i32>> = ["1", "x", "3"]
            .iter()
            .map(|s| Outcome::from(s.parse::<i32>()))
            .collect();
        assert!(collected.is_empty());
        assert_eq!(
            collected.get_message().unwrap(),
            "invalid digit found in string"
        );
    }
}
