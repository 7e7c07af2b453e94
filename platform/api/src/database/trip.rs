use chrono::{DateTime, Utc};

use super::Ulid;

/// Longest trip description we accept.
const MAX_DESCRIPTION_LENGTH: usize = 400;

#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum MembershipError {
    #[error("Trip is no longer open for more travel buddies.")]
    Closed,
    #[error("You are the owner of this trip and cannot be added as a possible travel buddy.")]
    OwnerAsBuddy,
    #[error("You are not the owner of this trip, and cannot remove another user as a possible travel buddy")]
    NotOwnerWithdraw,
    #[error("You are not the owner of this trip, and cannot promote a possible travel buddy")]
    NotOwnerPromote,
    #[error("You are not the owner of this trip, and cannot demote a travel buddy")]
    NotOwnerDemote,
    #[error("You are not the owner of this trip, and cannot remove a travel buddy")]
    NotOwnerRemove,
    #[error("You are not the owner of this trip, and cannot update it")]
    NotOwnerUpdate,
    #[error("Possible travel buddy not found")]
    PossibleBuddyNotFound,
    #[error("Travel buddy not found")]
    BuddyNotFound,
}

impl MembershipError {
    pub fn kind(&self) -> &'static str {
        match self {
            MembershipError::Closed => "InvalidState",
            MembershipError::OwnerAsBuddy
            | MembershipError::NotOwnerWithdraw
            | MembershipError::NotOwnerPromote
            | MembershipError::NotOwnerDemote
            | MembershipError::NotOwnerRemove
            | MembershipError::NotOwnerUpdate => "Forbidden",
            MembershipError::PossibleBuddyNotFound | MembershipError::BuddyNotFound => "NotFound",
        }
    }
}

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Trip {
    /// The unique identifier for the trip.
    pub id: Ulid,
    /// The user who created the trip, immutable.
    pub owner_id: Ulid,
    /// The destination country.
    pub country: String,
    /// A free-form description of the trip.
    pub description: String,
    /// How many confirmed travel buddies the owner is looking for.
    pub capacity: i32,
    /// When false, no new buddies can be proposed.
    pub open_for_more_buddies: bool,
    /// Users proposed as travel buddies, in proposal order. Disjoint from the
    /// confirmed list and never contains the owner.
    pub possible_buddy_ids: Vec<Ulid>,
    /// Users confirmed by the owner, in confirmation order. Disjoint from the
    /// possible list and never contains the owner.
    pub confirmed_buddy_ids: Vec<Ulid>,
    /// The time the trip was created.
    pub created_at: DateTime<Utc>,
    /// The time the trip was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The buddy-membership state machine.
///
/// Every transition is a pure function of the current trip and the involved
/// user ids, returning a fresh snapshot to persist. The stored lists are never
/// mutated in place. Authorization is part of each transition's contract: the
/// owner manages the lists, a user may only add or withdraw themself.
impl Trip {
    pub fn is_owner(&self, user_id: Ulid) -> bool {
        self.owner_id == user_id
    }

    fn is_possible_buddy(&self, user_id: Ulid) -> bool {
        self.possible_buddy_ids.contains(&user_id)
    }

    fn is_confirmed_buddy(&self, user_id: Ulid) -> bool {
        self.confirmed_buddy_ids.contains(&user_id)
    }

    /// A user volunteers as a travel buddy.
    ///
    /// Idempotent: proposing a user who is already on either list returns the
    /// unchanged snapshot. The open flag is checked before the owner rule.
    pub fn propose_buddy(&self, user_id: Ulid) -> Result<Trip, MembershipError> {
        if !self.open_for_more_buddies {
            return Err(MembershipError::Closed);
        }

        if self.is_owner(user_id) {
            return Err(MembershipError::OwnerAsBuddy);
        }

        let mut next = self.clone();

        if !next.is_possible_buddy(user_id) && !next.is_confirmed_buddy(user_id) {
            next.possible_buddy_ids.push(user_id);
        }

        Ok(next)
    }

    /// Takes a user off the possible list. Allowed for the trip owner and for
    /// the user withdrawing themself; a no-op if the user is not on the list.
    pub fn withdraw_buddy(&self, caller: Ulid, user_id: Ulid) -> Result<Trip, MembershipError> {
        if !self.is_owner(caller) && caller != user_id {
            return Err(MembershipError::NotOwnerWithdraw);
        }

        let mut next = self.clone();
        next.possible_buddy_ids.retain(|id| *id != user_id);

        Ok(next)
    }

    /// Moves a user from the possible list to the confirmed list, at the end.
    pub fn promote_buddy(&self, caller: Ulid, user_id: Ulid) -> Result<Trip, MembershipError> {
        if !self.is_owner(caller) {
            return Err(MembershipError::NotOwnerPromote);
        }

        let position = self
            .possible_buddy_ids
            .iter()
            .position(|id| *id == user_id)
            .ok_or(MembershipError::PossibleBuddyNotFound)?;

        let mut next = self.clone();
        next.possible_buddy_ids.remove(position);
        next.confirmed_buddy_ids.push(user_id);

        Ok(next)
    }

    /// Moves a confirmed buddy back to the end of the possible list.
    pub fn demote_buddy(&self, caller: Ulid, user_id: Ulid) -> Result<Trip, MembershipError> {
        if !self.is_owner(caller) {
            return Err(MembershipError::NotOwnerDemote);
        }

        let position = self
            .confirmed_buddy_ids
            .iter()
            .position(|id| *id == user_id)
            .ok_or(MembershipError::BuddyNotFound)?;

        let mut next = self.clone();
        next.confirmed_buddy_ids.remove(position);
        next.possible_buddy_ids.push(user_id);

        Ok(next)
    }

    /// Removes a confirmed buddy from the trip entirely.
    pub fn remove_buddy(&self, caller: Ulid, user_id: Ulid) -> Result<Trip, MembershipError> {
        if !self.is_owner(caller) {
            return Err(MembershipError::NotOwnerRemove);
        }

        if !self.is_confirmed_buddy(user_id) {
            return Err(MembershipError::BuddyNotFound);
        }

        let mut next = self.clone();
        next.confirmed_buddy_ids.retain(|id| *id != user_id);

        Ok(next)
    }

    /// Validates a trip description.
    pub fn validate_description(description: &str) -> Result<(), &'static str> {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err("Too long description");
        }

        Ok(())
    }

    /// Validates the number of travel buddies sought.
    pub fn validate_capacity(capacity: i32) -> Result<(), &'static str> {
        if capacity < 1 {
            return Err("Number of travel buddies must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[Ulid]) -> Vec<Ulid> {
        ids.to_vec()
    }

    fn trip(owner: Ulid) -> Trip {
        Trip {
            id: Ulid::new(),
            owner_id: owner,
            country: "Norway".to_string(),
            description: "Hiking the fjords".to_string(),
            capacity: 3,
            open_for_more_buddies: true,
            ..Default::default()
        }
    }

    /// The invariants every snapshot must uphold.
    fn assert_invariants(trip: &Trip) {
        assert!(!trip.possible_buddy_ids.contains(&trip.owner_id));
        assert!(!trip.confirmed_buddy_ids.contains(&trip.owner_id));

        for id in &trip.possible_buddy_ids {
            assert!(!trip.confirmed_buddy_ids.contains(id), "lists not disjoint");
        }
    }

    #[test]
    fn propose_appends_in_order() {
        let owner = Ulid::new();
        let (a, b) = (Ulid::new(), Ulid::new());

        let trip = trip(owner);
        let trip = trip.propose_buddy(a).unwrap();
        let trip = trip.propose_buddy(b).unwrap();

        assert_eq!(trip.possible_buddy_ids, ids(&[a, b]));
        assert_invariants(&trip);
    }

    #[test]
    fn propose_is_idempotent() {
        let owner = Ulid::new();
        let buddy = Ulid::new();

        let trip = trip(owner).propose_buddy(buddy).unwrap();
        let again = trip.propose_buddy(buddy).unwrap();

        assert_eq!(again.possible_buddy_ids, trip.possible_buddy_ids);
        assert_invariants(&again);
    }

    #[test]
    fn propose_ignores_confirmed_buddy() {
        let owner = Ulid::new();
        let buddy = Ulid::new();

        let trip = trip(owner).propose_buddy(buddy).unwrap();
        let trip = trip.promote_buddy(owner, buddy).unwrap();
        let trip = trip.propose_buddy(buddy).unwrap();

        assert!(trip.possible_buddy_ids.is_empty());
        assert_eq!(trip.confirmed_buddy_ids, ids(&[buddy]));
    }

    #[test]
    fn propose_fails_when_closed() {
        let mut closed = trip(Ulid::new());
        closed.open_for_more_buddies = false;

        assert_eq!(
            closed.propose_buddy(Ulid::new()).unwrap_err(),
            MembershipError::Closed
        );
    }

    #[test]
    fn owner_cannot_join_own_trip() {
        let owner = Ulid::new();

        assert_eq!(
            trip(owner).propose_buddy(owner).unwrap_err(),
            MembershipError::OwnerAsBuddy
        );
    }

    #[test]
    fn closed_check_comes_before_owner_check() {
        let owner = Ulid::new();
        let mut closed = trip(owner);
        closed.open_for_more_buddies = false;

        assert_eq!(closed.propose_buddy(owner).unwrap_err(), MembershipError::Closed);
    }

    #[test]
    fn withdraw_by_self_and_owner() {
        let owner = Ulid::new();
        let buddy = Ulid::new();

        // The proposed user can withdraw themself.
        let proposed = trip(owner).propose_buddy(buddy).unwrap();
        let withdrawn = proposed.withdraw_buddy(buddy, buddy).unwrap();
        assert!(withdrawn.possible_buddy_ids.is_empty());

        // So can the owner.
        let withdrawn = proposed.withdraw_buddy(owner, buddy).unwrap();
        assert!(withdrawn.possible_buddy_ids.is_empty());
    }

    #[test]
    fn withdraw_by_third_party_is_forbidden() {
        let owner = Ulid::new();
        let buddy = Ulid::new();

        let proposed = trip(owner).propose_buddy(buddy).unwrap();

        assert_eq!(
            proposed.withdraw_buddy(Ulid::new(), buddy).unwrap_err(),
            MembershipError::NotOwnerWithdraw
        );
    }

    #[test]
    fn withdraw_of_absent_user_is_noop() {
        let owner = Ulid::new();
        let stranger = Ulid::new();

        let trip = trip(owner);
        let after = trip.withdraw_buddy(owner, stranger).unwrap();

        assert_eq!(after.possible_buddy_ids, trip.possible_buddy_ids);
    }

    #[test]
    fn withdraw_preserves_order_of_the_rest() {
        let owner = Ulid::new();
        let (a, b, c) = (Ulid::new(), Ulid::new(), Ulid::new());

        let trip = trip(owner)
            .propose_buddy(a)
            .unwrap()
            .propose_buddy(b)
            .unwrap()
            .propose_buddy(c)
            .unwrap();

        let after = trip.withdraw_buddy(owner, b).unwrap();
        assert_eq!(after.possible_buddy_ids, ids(&[a, c]));
    }

    #[test]
    fn promote_moves_between_lists() {
        let owner = Ulid::new();
        let (a, b) = (Ulid::new(), Ulid::new());

        let trip = trip(owner)
            .propose_buddy(a)
            .unwrap()
            .propose_buddy(b)
            .unwrap();

        let promoted = trip.promote_buddy(owner, a).unwrap();

        assert_eq!(promoted.possible_buddy_ids, ids(&[b]));
        assert_eq!(promoted.confirmed_buddy_ids, ids(&[a]));
        assert_invariants(&promoted);
    }

    #[test]
    fn promote_requires_owner() {
        let owner = Ulid::new();
        let buddy = Ulid::new();

        let trip = trip(owner).propose_buddy(buddy).unwrap();

        assert_eq!(
            trip.promote_buddy(buddy, buddy).unwrap_err(),
            MembershipError::NotOwnerPromote
        );
    }

    #[test]
    fn promote_of_unproposed_user_fails() {
        let owner = Ulid::new();

        assert_eq!(
            trip(owner).promote_buddy(owner, Ulid::new()).unwrap_err(),
            MembershipError::PossibleBuddyNotFound
        );
    }

    #[test]
    fn demote_appends_at_end_of_possible_list() {
        let owner = Ulid::new();
        let (a, b) = (Ulid::new(), Ulid::new());

        let trip = trip(owner)
            .propose_buddy(a)
            .unwrap()
            .propose_buddy(b)
            .unwrap()
            .promote_buddy(owner, a)
            .unwrap();

        let demoted = trip.demote_buddy(owner, a).unwrap();

        // Back on the possible list, but at the end, not the original spot.
        assert_eq!(demoted.possible_buddy_ids, ids(&[b, a]));
        assert!(demoted.confirmed_buddy_ids.is_empty());
        assert_invariants(&demoted);
    }

    #[test]
    fn demote_requires_owner_and_membership() {
        let owner = Ulid::new();
        let buddy = Ulid::new();

        let trip = trip(owner)
            .propose_buddy(buddy)
            .unwrap()
            .promote_buddy(owner, buddy)
            .unwrap();

        assert_eq!(
            trip.demote_buddy(buddy, buddy).unwrap_err(),
            MembershipError::NotOwnerDemote
        );
        assert_eq!(
            trip.demote_buddy(owner, Ulid::new()).unwrap_err(),
            MembershipError::BuddyNotFound
        );
    }

    #[test]
    fn remove_requires_owner_and_membership() {
        let owner = Ulid::new();
        let buddy = Ulid::new();

        let trip = trip(owner)
            .propose_buddy(buddy)
            .unwrap()
            .promote_buddy(owner, buddy)
            .unwrap();

        assert_eq!(
            trip.remove_buddy(buddy, buddy).unwrap_err(),
            MembershipError::NotOwnerRemove
        );
        assert_eq!(
            trip.remove_buddy(owner, Ulid::new()).unwrap_err(),
            MembershipError::BuddyNotFound
        );

        let removed = trip.remove_buddy(owner, buddy).unwrap();
        assert!(removed.confirmed_buddy_ids.is_empty());
        assert!(removed.possible_buddy_ids.is_empty());
    }

    #[test]
    fn transitions_never_alias_the_source_snapshot() {
        let owner = Ulid::new();
        let buddy = Ulid::new();

        let trip = trip(owner);
        let proposed = trip.propose_buddy(buddy).unwrap();

        assert!(trip.possible_buddy_ids.is_empty());
        assert_eq!(proposed.possible_buddy_ids, ids(&[buddy]));
    }

    #[test]
    fn full_lifecycle_scenario() {
        // Owner solicits a buddy, confirms them, then drops them.
        let owner = Ulid::new();
        let buddy = Ulid::new();

        let trip = trip(owner);

        let trip = trip.propose_buddy(buddy).unwrap();
        assert_eq!(trip.possible_buddy_ids, ids(&[buddy]));

        let trip = trip.promote_buddy(owner, buddy).unwrap();
        assert!(trip.possible_buddy_ids.is_empty());
        assert_eq!(trip.confirmed_buddy_ids, ids(&[buddy]));

        let trip = trip.remove_buddy(owner, buddy).unwrap();
        assert!(trip.confirmed_buddy_ids.is_empty());
        assert_invariants(&trip);
    }

    #[test]
    fn validation_limits() {
        assert!(Trip::validate_description(&"x".repeat(400)).is_ok());
        assert_eq!(
            Trip::validate_description(&"x".repeat(401)),
            Err("Too long description")
        );

        assert!(Trip::validate_capacity(1).is_ok());
        assert_eq!(
            Trip::validate_capacity(0),
            Err("Number of travel buddies must be at least 1")
        );
    }
}
