//! Stream helpers

use futures::stream::{Stream, StreamExt};

/// Drive a stream to completion, discarding its items
///
/// Stops at and returns the first error.
pub async fn exhaust<S, T, E>(mut stream: S) -> Result<(), E>
where
    S: Stream<Item = Result<T, E>> + Unpin,
{
    while let Some(item) = stream.next().await {
        item?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    #[test]
    fn test_exhaust_drains() {
        let items = stream::iter(vec![Ok::<_, String>(1), Ok(2), Ok(3)]);
        assert_eq!(pollster::block_on(exhaust(items)), Ok(()));
    }

    #[test]
    fn test_exhaust_stops_at_error() {
        let mut pulled = 0;
        let items = stream::iter(vec![Ok(1), Err("bad".to_string()), Ok(3)]).inspect(|_| pulled += 1);
        assert_eq!(pollster::block_on(exhaust(items)), Err("bad".to_string()));
        assert_eq!(pulled, 2);
    }
}
