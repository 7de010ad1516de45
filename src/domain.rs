use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

/// Lifecycle of a commission from intake to hand-off.
///
/// Orders advance exactly one step at a time through [`OrderStatus::PIPELINE`];
/// `Declined` is a terminal escape reachable from any non-terminal status.
/// Statuses are stored as plain strings in the database, so parsing is
/// fail-soft: rows carrying an unknown status are skipped by the analytics
/// layer instead of aborting a report.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    New,
    Confirmed,
    CadDone,
    UserConfirmed,
    RptDone,
    Casting,
    Ready,
    Delivered,
    Declined,
}

impl OrderStatus {
    /// Forward path of the pipeline, in order. `Declined` is not a step.
    pub const PIPELINE: [OrderStatus; 8] = [
        OrderStatus::New,
        OrderStatus::Confirmed,
        OrderStatus::CadDone,
        OrderStatus::UserConfirmed,
        OrderStatus::RptDone,
        OrderStatus::Casting,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    /// Statuses reported under the synthetic `in_progress` group: everything
    /// strictly between intake and the terminal outcomes.
    pub const IN_PROGRESS: [OrderStatus; 6] = [
        OrderStatus::Confirmed,
        OrderStatus::CadDone,
        OrderStatus::UserConfirmed,
        OrderStatus::RptDone,
        OrderStatus::Casting,
        OrderStatus::Ready,
    ];

    /// Parses a stored status string, returning `None` for values the
    /// pipeline does not know about.
    pub fn parse(raw: &str) -> Option<OrderStatus> {
        raw.parse().ok()
    }

    /// Zero-based position in the forward pipeline. `Declined` has none.
    pub fn position(self) -> Option<usize> {
        Self::PIPELINE.iter().position(|s| *s == self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Declined)
    }

    /// An order still moving through the pipeline (not delivered or declined).
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    pub fn is_in_progress(self) -> bool {
        Self::IN_PROGRESS.contains(&self)
    }

    /// The next forward step, if any.
    pub fn next(self) -> Option<OrderStatus> {
        let pos = self.position()?;
        Self::PIPELINE.get(pos + 1).copied()
    }

    /// A transition is legal when it moves exactly one step forward, or
    /// declines an order that has not already reached a terminal status.
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if target == OrderStatus::Declined {
            return true;
        }
        self.next() == Some(target)
    }

    /// Human-readable label used in dashboard payloads.
    pub fn display_label(self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::CadDone => "CAD Done",
            OrderStatus::UserConfirmed => "User Confirmed",
            OrderStatus::RptDone => "RPT Done",
            OrderStatus::Casting => "Casting",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Declined => "Declined",
        }
    }

    pub fn all() -> impl Iterator<Item = OrderStatus> {
        Self::iter()
    }
}

/// Who authored an order message.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SenderType {
    User,
    Admin,
    System,
}

impl SenderType {
    pub fn parse(raw: &str) -> Option<SenderType> {
        raw.parse().ok()
    }
}

/// Workflow state of a contact-form ticket.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactStatus {
    New,
    InProgress,
    Resolved,
    Closed,
}

impl ContactStatus {
    pub fn parse(raw: &str) -> Option<ContactStatus> {
        raw.parse().ok()
    }

    /// Tickets still waiting on the studio.
    pub fn is_open(self) -> bool {
        matches!(self, ContactStatus::New | ContactStatus::InProgress)
    }

    /// Tickets counted toward the resolution rate.
    pub fn is_settled(self) -> bool {
        matches!(self, ContactStatus::Resolved | ContactStatus::Closed)
    }
}

/// How a contact-form customer prefers to be reached.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Phone,
    Whatsapp,
}

/// Editorial category of a news item.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NewsCategory {
    Announcement,
    Sale,
    Promotion,
    Update,
    Event,
    Personal,
}

/// Display priority of a news item.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NewsPriority {
    High,
    Medium,
    Low,
}

/// Loyalty tier derived from a customer's lifetime order count.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, ToSchema,
)]
pub enum CustomerTier {
    #[serde(rename = "VIP")]
    #[strum(serialize = "VIP")]
    Vip,
    #[serde(rename = "Gold")]
    #[strum(serialize = "Gold")]
    Gold,
    #[serde(rename = "Silver")]
    #[strum(serialize = "Silver")]
    Silver,
    #[serde(rename = "Regular")]
    #[strum(serialize = "Regular")]
    Regular,
}

impl CustomerTier {
    pub fn from_order_count(count: u64) -> CustomerTier {
        if count >= 10 {
            CustomerTier::Vip
        } else if count >= 5 {
            CustomerTier::Gold
        } else if count >= 2 {
            CustomerTier::Silver
        } else {
            CustomerTier::Regular
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_moves_one_step_at_a_time() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::CadDone));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));

        assert!(!OrderStatus::New.can_transition_to(OrderStatus::CadDone));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::New));
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::New));
    }

    #[test]
    fn decline_is_reachable_from_any_active_status() {
        for status in OrderStatus::PIPELINE {
            if status == OrderStatus::Delivered {
                continue;
            }
            assert!(
                status.can_transition_to(OrderStatus::Declined),
                "{status} should be declinable"
            );
        }
    }

    #[test]
    fn terminal_statuses_cannot_move() {
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Declined));
        assert!(!OrderStatus::Declined.can_transition_to(OrderStatus::New));
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Declined.is_terminal());
        assert_eq!(OrderStatus::Declined.position(), None);
    }

    #[test]
    fn parse_is_fail_soft() {
        assert_eq!(OrderStatus::parse("cad_done"), Some(OrderStatus::CadDone));
        assert_eq!(OrderStatus::parse("rpt_done"), Some(OrderStatus::RptDone));
        assert_eq!(OrderStatus::parse("shipped"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn display_matches_stored_form() {
        assert_eq!(OrderStatus::UserConfirmed.to_string(), "user_confirmed");
        assert_eq!(SenderType::System.to_string(), "system");
        assert_eq!(ContactStatus::InProgress.to_string(), "in_progress");
        assert_eq!(CustomerTier::Vip.to_string(), "VIP");
    }

    #[test]
    fn in_progress_excludes_endpoints() {
        assert!(!OrderStatus::New.is_in_progress());
        assert!(!OrderStatus::Delivered.is_in_progress());
        assert!(!OrderStatus::Declined.is_in_progress());
        assert!(OrderStatus::Casting.is_in_progress());
        assert_eq!(OrderStatus::IN_PROGRESS.len(), 6);
    }

    #[test]
    fn tiers_follow_order_count_thresholds() {
        assert_eq!(CustomerTier::from_order_count(0), CustomerTier::Regular);
        assert_eq!(CustomerTier::from_order_count(1), CustomerTier::Regular);
        assert_eq!(CustomerTier::from_order_count(2), CustomerTier::Silver);
        assert_eq!(CustomerTier::from_order_count(5), CustomerTier::Gold);
        assert_eq!(CustomerTier::from_order_count(9), CustomerTier::Gold);
        assert_eq!(CustomerTier::from_order_count(10), CustomerTier::Vip);
    }

    #[test]
    fn open_and_settled_partition_contact_statuses() {
        for status in ContactStatus::iter() {
            assert_ne!(status.is_open(), status.is_settled());
        }
    }
}
