//! # Mock Framework
//!
//! Test helpers for exercising [`LedgerClient`] without a running service.
//!
//! [`create_mock_client`] returns a client plus the receiving end of its
//! channel; the `expect_*` helpers pull the next request off it so the test
//! can assert on the parameters and answer (or drop) the responder.

use tokio::sync::mpsc;

use crate::clients::LedgerClient;
use crate::domain::{Trip, User, UserId};
use crate::error::LedgerError;
use crate::messages::{LedgerRequest, ServiceResponse};

pub fn create_mock_client(buffer_size: usize) -> (LedgerClient, mpsc::Receiver<LedgerRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (LedgerClient::new(sender), receiver)
}

/// Next message must be a RequestTrip
pub async fn expect_request_trip(
    receiver: &mut mpsc::Receiver<LedgerRequest>,
) -> Option<(UserId, ServiceResponse<Trip, LedgerError>)> {
    match receiver.recv().await {
        Some(LedgerRequest::RequestTrip { user_id, respond_to }) => Some((user_id, respond_to)),
        _ => None,
    }
}

/// Next message must be a FindUser
pub async fn expect_find_user(
    receiver: &mut mpsc::Receiver<LedgerRequest>,
) -> Option<(UserId, ServiceResponse<Option<User>, LedgerError>)> {
    match receiver.recv().await {
        Some(LedgerRequest::FindUser { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::fixtures::day;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let request = tokio::spawn(async move { client.request_trip(1).await });

        let (user_id, responder) = expect_request_trip(&mut receiver)
            .await
            .expect("Expected RequestTrip");
        assert_eq!(user_id, 1);
        let trip = Trip::in_progress(4, 5, 1, day(20)).unwrap();
        responder.send(Ok(trip.clone())).unwrap();

        assert_eq!(request.await.unwrap(), Ok(trip));
    }

    #[tokio::test]
    async fn dropped_responder_is_a_communication_error() {
        let (client, mut receiver) = create_mock_client(10);
        let lookup = tokio::spawn(async move { client.find_user(3).await });

        let (id, responder) = expect_find_user(&mut receiver).await.expect("Expected FindUser");
        assert_eq!(id, 3);
        drop(responder);

        assert_eq!(
            lookup.await.unwrap(),
            Err(LedgerError::ActorCommunicationError("Actor dropped".to_string()))
        );
    }

    #[tokio::test]
    async fn closed_service_is_a_communication_error() {
        let (client, receiver) = create_mock_client(1);
        drop(receiver);
        assert_eq!(
            client.request_trip(1).await,
            Err(LedgerError::ActorCommunicationError("Actor closed".to_string()))
        );
    }
}
