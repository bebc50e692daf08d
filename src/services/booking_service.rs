//! Booking Orchestrator: the one externally-callable operation that turns a
//! slot selection into a booked session.
//!
//! The store gives us no transactions, so the workflow approximates one:
//! reserve the contended resource first, then perform the remaining steps,
//! compensating the reservation if session creation fails. Steps run
//! strictly in order within one call; ordering across concurrent calls is
//! provided only by the slot CAS.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{BookingRequest, Session};
use crate::services::errors::{BookingError, SessionError, SlotError};
use crate::services::{AvailabilityService, RelationshipService, SessionService};
use crate::store::MarketplaceStore;

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn MarketplaceStore>,
    availability: AvailabilityService,
    sessions: SessionService,
    relationships: RelationshipService,
}

impl BookingService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self {
            availability: AvailabilityService::new(store.clone()),
            sessions: SessionService::new(store.clone()),
            relationships: RelationshipService::new(store.clone()),
            store,
        }
    }

    /// Book a session.
    ///
    /// 1. Validate the request against the trainer's advertised hours.
    /// 2. Reserve: remove the slot. A failure here aborts before any other
    ///    write — at most one booker can get past this point per slot.
    /// 3. Create the session; on failure, restore the slot and propagate.
    /// 4. Link the client/trainer relationship. A failure here does NOT
    ///    roll anything back: the booking stands and `LinkUpdateFailed`
    ///    carries the created session so the caller can retry the link.
    pub async fn book(&self, request: BookingRequest) -> Result<Session, BookingError> {
        let request = self.validate(request).await?;

        self.reserve_slot(request.trainer_id, &request.time).await?;

        let session = match self.sessions.create_session(&request).await {
            Ok(session) => session,
            Err(err) => {
                self.restore_slot(request.trainer_id, &request.time).await;
                return Err(match err {
                    SessionError::ConflictingBooking => BookingError::ConflictingBooking,
                    SessionError::InvalidSlot => {
                        BookingError::Validation("session date must not be in the past".into())
                    }
                    SessionError::TrainerNotFound => BookingError::TrainerNotFound,
                    other => BookingError::Session(other),
                });
            }
        };

        if let Err(source) = self
            .relationships
            .link_after_booking(request.user_id, request.trainer_id)
            .await
        {
            warn!(
                session_id = %session.id,
                user_id = %request.user_id,
                trainer_id = %request.trainer_id,
                error = %source,
                "booking stands but relationship link failed"
            );
            return Err(BookingError::LinkUpdateFailed {
                session: Box::new(session),
                source,
            });
        }

        info!(
            session_id = %session.id,
            trainer_id = %session.trainer_id,
            date = %session.date,
            time = %session.time,
            "session booked"
        );
        Ok(session)
    }

    async fn validate(&self, mut request: BookingRequest) -> Result<BookingRequest, BookingError> {
        request.time = request.time.trim().to_string();
        if request.time.is_empty() {
            return Err(BookingError::Validation("time slot must not be empty".into()));
        }
        if request.date < Utc::now().date_naive() {
            return Err(BookingError::Validation(
                "date must be today or later".into(),
            ));
        }

        // Fail before reserving when the caller does not exist; the
        // relationship step would otherwise strand a compensation-less
        // failure in step 4.
        if self.store.get_user(request.user_id).await?.is_none() {
            return Err(BookingError::UserNotFound);
        }

        let offered = match self.availability.list_slots(request.trainer_id).await {
            Ok(slots) => slots,
            Err(SlotError::TrainerNotFound) => return Err(BookingError::TrainerNotFound),
            Err(SlotError::Store(err)) => return Err(BookingError::Store(err)),
            Err(_) => return Err(BookingError::SlotNotOffered),
        };
        if !offered.iter().any(|s| s == &request.time) {
            // A slot that is gone because someone booked it is contention,
            // not a bad request; the caller may re-fetch and retry.
            if self
                .store
                .find_booked_session(request.trainer_id, request.date, &request.time)
                .await?
                .is_some()
            {
                return Err(BookingError::SlotUnavailable);
            }
            return Err(BookingError::SlotNotOffered);
        }

        Ok(request)
    }

    async fn reserve_slot(&self, trainer_id: Uuid, time: &str) -> Result<(), BookingError> {
        match self.availability.remove_slot(trainer_id, time).await {
            Ok(()) => Ok(()),
            // Gone between validation and reservation, or lost the CAS race:
            // either way the slot was sold to someone else.
            Err(SlotError::SlotNotFound) => Err(BookingError::SlotUnavailable),
            Err(SlotError::TrainerNotFound) => Err(BookingError::TrainerNotFound),
            Err(SlotError::Store(err)) => Err(BookingError::Store(err)),
            Err(_) => Err(BookingError::SlotUnavailable),
        }
    }

    /// Compensation for step 3: put the consumed slot back so availability
    /// is not silently lost. A failure here is logged and must not mask the
    /// error that triggered it.
    async fn restore_slot(&self, trainer_id: Uuid, time: &str) {
        match self.availability.add_slot(trainer_id, time).await {
            // Someone re-advertised the identical slot in the meantime;
            // availability is already back.
            Ok(()) | Err(SlotError::DuplicateSlot) => {}
            Err(err) => {
                warn!(
                    trainer_id = %trainer_id,
                    slot = %time,
                    error = %err,
                    "failed to restore slot after booking failure"
                );
            }
        }
    }
}
