/// Result of a resume-class operation: the computation either suspended with a value or exhausted
/// with its final payload.
///
/// `Step` plays the role `Option` plays for iterators, except that running out carries a value.
///
/// # Examples
///
/// ```rust
/// use resumable::Step;
///
/// let suspended: Step<i32, String> = Step::Yielded(42);
/// let exhausted: Step<i32, String> = Step::Exhausted("done".to_string());
///
/// assert_eq!(suspended.map_yielded(|x| x * 2), Step::Yielded(84));
/// assert!(exhausted.is_exhausted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step<Y, R> {
    /// The computation reached a suspension point and produced a value.
    Yielded(Y),
    /// The computation ran to completion, carrying its final payload.
    Exhausted(R),
}

impl<Y, R> Step<Y, R> {
    /// Returns `true` if the step is `Yielded`.
    #[inline]
    pub const fn is_yielded(&self) -> bool {
        matches!(self, Step::Yielded(_))
    }

    /// Returns `true` if the step is `Exhausted`.
    #[inline]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Step::Exhausted(_))
    }

    /// Converts from `Step<Y, R>` to `Option<Y>`, discarding a final payload.
    ///
    /// ```rust
    /// use resumable::Step;
    ///
    /// let x: Step<i32, &str> = Step::Yielded(42);
    /// assert_eq!(x.yielded_value(), Some(42));
    /// ```
    #[inline]
    pub fn yielded_value(self) -> Option<Y> {
        match self {
            Step::Yielded(y) => Some(y),
            Step::Exhausted(_) => None,
        }
    }

    /// Converts from `Step<Y, R>` to `Option<R>`, discarding a yielded value.
    #[inline]
    pub fn exhausted_value(self) -> Option<R> {
        match self {
            Step::Yielded(_) => None,
            Step::Exhausted(r) => Some(r),
        }
    }

    /// Maps the yielded value, leaving a final payload untouched.
    ///
    /// ```rust
    /// use resumable::Step;
    ///
    /// let y: Step<i32, &str> = Step::Exhausted("done");
    /// assert_eq!(y.map_yielded(|v: i32| v * 2), Step::Exhausted("done"));
    /// ```
    #[inline]
    pub fn map_yielded<Y2, F>(self, f: F) -> Step<Y2, R>
    where
        F: FnOnce(Y) -> Y2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(f(y)),
            Step::Exhausted(r) => Step::Exhausted(r),
        }
    }

    /// Maps the final payload, leaving a yielded value untouched.
    #[inline]
    pub fn map_exhausted<R2, F>(self, f: F) -> Step<Y, R2>
    where
        F: FnOnce(R) -> R2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(y),
            Step::Exhausted(r) => Step::Exhausted(f(r)),
        }
    }

    /// Converts from `&Step<Y, R>` to `Step<&Y, &R>`.
    #[inline]
    pub const fn as_ref(&self) -> Step<&Y, &R> {
        match self {
            Step::Yielded(y) => Step::Yielded(y),
            Step::Exhausted(r) => Step::Exhausted(r),
        }
    }

    /// Returns the contained `Yielded` value.
    ///
    /// # Panics
    ///
    /// Panics if the step is `Exhausted`.
    #[inline]
    pub fn unwrap_yielded(self) -> Y {
        match self {
            Step::Yielded(y) => y,
            Step::Exhausted(_) => panic!("called `Step::unwrap_yielded()` on an `Exhausted` value"),
        }
    }

    /// Returns the contained `Exhausted` payload.
    ///
    /// # Panics
    ///
    /// Panics if the step is `Yielded`.
    #[inline]
    pub fn unwrap_exhausted(self) -> R {
        match self {
            Step::Yielded(_) => panic!("called `Step::unwrap_exhausted()` on a `Yielded` value"),
            Step::Exhausted(r) => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yielded_and_is_exhausted() {
        let y: Step<i32, &str> = Step::Yielded(42);
        let d: Step<i32, &str> = Step::Exhausted("done");

        assert!(y.is_yielded());
        assert!(!y.is_exhausted());
        assert!(d.is_exhausted());
        assert!(!d.is_yielded());
    }

    #[test]
    fn test_value_accessors() {
        let y: Step<i32, &str> = Step::Yielded(42);
        let d: Step<i32, &str> = Step::Exhausted("done");

        assert_eq!(y.yielded_value(), Some(42));
        assert_eq!(y.exhausted_value(), None);
        assert_eq!(d.yielded_value(), None);
        assert_eq!(d.exhausted_value(), Some("done"));
    }

    #[test]
    fn test_map_only_touches_matching_side() {
        let y: Step<i32, i32> = Step::Yielded(42);
        let d: Step<i32, i32> = Step::Exhausted(10);

        assert_eq!(y.map_exhausted(|x| x * 2), Step::Yielded(42));
        assert_eq!(d.map_exhausted(|x| x * 2), Step::Exhausted(20));
        assert_eq!(y.map_yielded(|x| x + 1), Step::Yielded(43));
        assert_eq!(d.map_yielded(|x| x + 1), Step::Exhausted(10));
    }

    #[test]
    #[should_panic(expected = "called `Step::unwrap_yielded()` on an `Exhausted` value")]
    fn test_unwrap_yielded_panics() {
        let d: Step<i32, &str> = Step::Exhausted("done");
        d.unwrap_yielded();
    }

    #[test]
    #[should_panic(expected = "called `Step::unwrap_exhausted()` on a `Yielded` value")]
    fn test_unwrap_exhausted_panics() {
        let y: Step<i32, &str> = Step::Yielded(42);
        y.unwrap_exhausted();
    }
}
