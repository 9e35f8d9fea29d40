use crate::errors::{BoxError, Failure};

/// Short-circuits on `Some(err)`.
///
/// The returned `Failure` is meant to be propagated with `?` up to a
/// [`recover`](crate::recover) boundary. `None` is a no-op.
pub fn check<E>(err: Option<E>) -> Result<(), Failure>
where
    E: Into<BoxError>,
{
    match err {
        None => Ok(()),
        Some(err) => Err(fail(err)),
    }
}

pub fn check_result<E>(result: Result<(), E>) -> Result<(), Failure>
where
    E: Into<BoxError>,
{
    check(result.err())
}

/// Checks `err` and hands `value` back untouched when there is none.
pub fn must<T, E>(value: T, err: Option<E>) -> Result<T, Failure>
where
    E: Into<BoxError>,
{
    check(err)?;
    Ok(value)
}

/// Expression-position checking for results: `let n = s.parse::<u32>().must()?;`
pub trait MustExt<T> {
    fn must(self) -> Result<T, Failure>;
}

impl<T, E> MustExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn must(self) -> Result<T, Failure> {
        self.map_err(fail)
    }
}

fn fail<E>(err: E) -> Failure
where
    E: Into<BoxError>,
{
    let failure = Failure::new(err);
    tracing::debug!(error = %failure, "check failed");
    failure
}
