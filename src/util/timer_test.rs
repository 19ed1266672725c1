use super::*;

#[tokio::test]
async fn finished_operation_wins() {
    let result = race(async { Ok::<_, ServiceError>(7) }, future::pending()).await;
    assert_eq!(result, Ok(7));
}

#[tokio::test]
async fn operation_error_passes_through() {
    let result: Result<(), _> = race(async { Err(ServiceError::NotSignedIn) }, future::pending()).await;
    assert_eq!(result, Err(ServiceError::NotSignedIn));
}

#[tokio::test]
async fn timeout_wins_over_stuck_operation() {
    let result: Result<(), _> = race(future::pending(), async {}).await;
    assert_eq!(result, Err(ServiceError::TimedOut));
}

#[tokio::test]
async fn native_timeout_never_fires() {
    if cfg!(feature = "csr") {
        return;
    }
    assert_eq!(with_timeout(async { Ok::<_, ServiceError>("done") }, 0).await, Ok("done"));
}
