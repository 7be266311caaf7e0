//! Record and absence-period entry dialog.
//!
//! An [`EntrySession`] walks one employee through entering a daily record
//! or an absence period: pick what to enter, supply the date(s), supply hours
//! for an ordinary shift, then confirm. Writing over an existing record always
//! requires an explicit confirmation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculation::{SHIFT_LENGTH_HOURS, validate_range};
use crate::error::{EngineError, EngineResult};
use crate::models::{AbsencePeriod, DailyRecord, PeriodKind, RecordKind};
use crate::store::RecordStore;

/// Fewest hours accepted for an ordinary shift.
pub const MIN_SHIFT_HOURS: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// What a record-entry session is entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// An ordinary shift; hours are asked for.
    Shift,
    /// A reinforcement shift, always a full shift.
    Reinforcement,
    /// A vacation day.
    Vacation,
    /// A sick day.
    Sick,
    /// An unpaid day off.
    Unpaid,
}

impl EntryKind {
    /// Returns the record kind written for this entry.
    pub fn record_kind(self) -> RecordKind {
        match self {
            EntryKind::Shift => RecordKind::Work,
            EntryKind::Reinforcement => RecordKind::Reinforcement,
            EntryKind::Vacation => RecordKind::Vacation,
            EntryKind::Sick => RecordKind::Sick,
            EntryKind::Unpaid => RecordKind::Unpaid,
        }
    }

    /// Returns the hours recorded without asking, or `None` for an ordinary shift.
    pub fn fixed_hours(self) -> Option<Decimal> {
        match self {
            EntryKind::Shift => None,
            EntryKind::Reinforcement => Some(SHIFT_LENGTH_HOURS),
            EntryKind::Vacation | EntryKind::Sick | EntryKind::Unpaid => Some(Decimal::ZERO),
        }
    }
}

impl From<RecordKind> for EntryKind {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Work => EntryKind::Shift,
            RecordKind::Reinforcement => EntryKind::Reinforcement,
            RecordKind::Vacation => EntryKind::Vacation,
            RecordKind::Sick => EntryKind::Sick,
            RecordKind::Unpaid => EntryKind::Unpaid,
        }
    }
}

/// Rejects ordinary-shift hours outside `0.5..=12`.
pub fn validate_shift_hours(hours: Decimal) -> EngineResult<()> {
    if hours < MIN_SHIFT_HOURS || hours > SHIFT_LENGTH_HOURS {
        return Err(EngineError::InvalidHours { hours });
    }
    Ok(())
}

/// A record waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecord {
    /// Target date.
    pub date: NaiveDate,
    /// Kind to write.
    pub kind: RecordKind,
    /// Hours to write.
    pub hours: Decimal,
}

/// Where an entry session currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing in progress.
    Idle,
    /// Waiting for the date of a daily record.
    AwaitingDate {
        /// What is being entered.
        entry: EntryKind,
    },
    /// Waiting for the hours of an ordinary shift.
    AwaitingHours {
        /// The date already chosen.
        date: NaiveDate,
    },
    /// The date already holds a record; waiting for confirm or decline.
    AwaitingOverwrite {
        /// The record that would be written.
        pending: PendingRecord,
        /// The record that would be replaced.
        existing: DailyRecord,
    },
    /// Waiting for the first day of an absence period.
    AwaitingPeriodStart {
        /// Kind of period.
        kind: PeriodKind,
    },
    /// Waiting for the last day of an absence period.
    AwaitingPeriodEnd {
        /// Kind of period.
        kind: PeriodKind,
        /// First day already chosen.
        start: NaiveDate,
    },
    /// Period fully specified; waiting for confirm or decline.
    AwaitingPeriodConfirm {
        /// Kind of period.
        kind: PeriodKind,
        /// First day.
        start: NaiveDate,
        /// Last day.
        end: NaiveDate,
        /// Daily records already inside the period.
        conflicts: Vec<DailyRecord>,
    },
}

impl SessionState {
    /// Returns a short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingDate { .. } => "awaiting_date",
            SessionState::AwaitingHours { .. } => "awaiting_hours",
            SessionState::AwaitingOverwrite { .. } => "awaiting_overwrite",
            SessionState::AwaitingPeriodStart { .. } => "awaiting_period_start",
            SessionState::AwaitingPeriodEnd { .. } => "awaiting_period_end",
            SessionState::AwaitingPeriodConfirm { .. } => "awaiting_period_confirm",
        }
    }
}

/// One step of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SessionInput {
    /// A chosen date.
    Date(NaiveDate),
    /// Hours worked.
    Hours(Decimal),
    /// Go ahead with the pending write.
    Confirm,
    /// Drop the pending write.
    Decline,
    /// Leave the dialog from any state.
    Abandon,
}

impl SessionInput {
    /// Returns a short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            SessionInput::Date(_) => "date",
            SessionInput::Hours(_) => "hours",
            SessionInput::Confirm => "confirm",
            SessionInput::Decline => "decline",
            SessionInput::Abandon => "abandon",
        }
    }
}

/// What applying an input produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session moved to another waiting state.
    Advanced,
    /// A daily record was written; the session is idle again.
    RecordSaved {
        /// The stored record.
        record: DailyRecord,
    },
    /// An absence period was written; the session is idle again.
    PeriodSaved {
        /// The stored period.
        period: AbsencePeriod,
    },
    /// The dialog ended without writing anything.
    Cancelled,
}

/// An entry dialog for one employee.
///
/// # Example
///
/// ```
/// use shift_ledger::models::{Crew, NewEmployee, RecordKind};
/// use shift_ledger::session::{EntryKind, EntrySession, SessionEvent, SessionInput};
/// use shift_ledger::store::{RecordStore, SqliteStore};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let store = SqliteStore::open_in_memory()?;
/// store.add_employee(&NewEmployee { id: 7, full_name: "Anna".into(), crew: Crew::One })?;
///
/// let mut session = EntrySession::new(7);
/// session.begin_record(EntryKind::Shift);
/// let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
/// session.apply(&store, SessionInput::Date(date))?;
/// let event = session.apply(&store, SessionInput::Hours(Decimal::new(11, 0)))?;
///
/// assert!(matches!(event, SessionEvent::RecordSaved { .. }));
/// assert_eq!(store.get_record(7, date)?.unwrap().kind, RecordKind::Work);
/// # Ok::<(), shift_ledger::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySession {
    employee_id: i64,
    state: SessionState,
}

impl EntrySession {
    /// Creates an idle session for `employee_id`.
    pub fn new(employee_id: i64) -> Self {
        Self {
            employee_id,
            state: SessionState::Idle,
        }
    }

    /// The employee this session writes for.
    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    /// The current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Starts entering a daily record, dropping anything in progress.
    pub fn begin_record(&mut self, entry: EntryKind) {
        self.state = SessionState::AwaitingDate { entry };
    }

    /// Starts entering an absence period, dropping anything in progress.
    pub fn begin_period(&mut self, kind: PeriodKind) {
        self.state = SessionState::AwaitingPeriodStart { kind };
    }

    /// Applies one input.
    ///
    /// An input the current state cannot take fails with
    /// [`EngineError::InvalidTransition`] and leaves the state untouched; so
    /// do out-of-range hours and an inverted period. A store failure ends the
    /// session: the state is back to [`SessionState::Idle`] and nothing was
    /// partially written.
    pub fn apply<S>(&mut self, store: &S, input: SessionInput) -> EngineResult<SessionEvent>
    where
        S: RecordStore + ?Sized,
    {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        debug!(
            employee_id = self.employee_id,
            state = state.name(),
            input = input.name(),
            "Applying session input"
        );

        match (state, input) {
            (_, SessionInput::Abandon) => Ok(SessionEvent::Cancelled),

            (SessionState::AwaitingDate { entry }, SessionInput::Date(date)) => {
                match entry.fixed_hours() {
                    None => {
                        self.state = SessionState::AwaitingHours { date };
                        Ok(SessionEvent::Advanced)
                    }
                    Some(hours) => self.stage(
                        store,
                        PendingRecord {
                            date,
                            kind: entry.record_kind(),
                            hours,
                        },
                    ),
                }
            }

            (SessionState::AwaitingHours { date }, SessionInput::Hours(hours)) => {
                if let Err(e) = validate_shift_hours(hours) {
                    self.state = SessionState::AwaitingHours { date };
                    return Err(e);
                }
                self.stage(
                    store,
                    PendingRecord {
                        date,
                        kind: RecordKind::Work,
                        hours,
                    },
                )
            }

            (SessionState::AwaitingOverwrite { pending, .. }, SessionInput::Confirm) => {
                self.write_record(store, &pending)
            }

            (SessionState::AwaitingPeriodStart { kind }, SessionInput::Date(start)) => {
                self.state = SessionState::AwaitingPeriodEnd { kind, start };
                Ok(SessionEvent::Advanced)
            }

            (SessionState::AwaitingPeriodEnd { kind, start }, SessionInput::Date(end)) => {
                if let Err(e) = validate_range(start, end) {
                    self.state = SessionState::AwaitingPeriodEnd { kind, start };
                    return Err(e);
                }
                let conflicts = self.on_store_failure(store.get_records_in_range(
                    self.employee_id,
                    start,
                    end,
                ))?;
                self.state = SessionState::AwaitingPeriodConfirm {
                    kind,
                    start,
                    end,
                    conflicts,
                };
                Ok(SessionEvent::Advanced)
            }

            (SessionState::AwaitingPeriodConfirm { kind, start, end, .. }, SessionInput::Confirm) => {
                let period = self.on_store_failure(store.add_absence_period(
                    self.employee_id,
                    kind,
                    start,
                    end,
                ))?;
                Ok(SessionEvent::PeriodSaved { period })
            }

            (
                SessionState::AwaitingOverwrite { .. } | SessionState::AwaitingPeriodConfirm { .. },
                SessionInput::Decline,
            ) => Ok(SessionEvent::Cancelled),

            (state, input) => {
                let error = EngineError::InvalidTransition {
                    state: state.name().to_string(),
                    input: input.name().to_string(),
                };
                self.state = state;
                Err(error)
            }
        }
    }

    /// Writes `pending` unless its date is taken, in which case asks first.
    fn stage<S>(&mut self, store: &S, pending: PendingRecord) -> EngineResult<SessionEvent>
    where
        S: RecordStore + ?Sized,
    {
        let inserted =
            store.insert_record(self.employee_id, pending.date, pending.kind, pending.hours);
        let conflict = match inserted {
            Ok(record) => return Ok(SessionEvent::RecordSaved { record }),
            Err(e @ EngineError::Conflict { .. }) => e,
            Err(e) => return self.on_store_failure(Err(e)),
        };

        match self.on_store_failure(store.get_record(self.employee_id, pending.date))? {
            Some(existing) => {
                self.state = SessionState::AwaitingOverwrite { pending, existing };
                Ok(SessionEvent::Advanced)
            }
            // Deleted again since the insert was refused
            None => self.on_store_failure(Err(conflict)),
        }
    }

    fn write_record<S>(&mut self, store: &S, pending: &PendingRecord) -> EngineResult<SessionEvent>
    where
        S: RecordStore + ?Sized,
    {
        let record = self.on_store_failure(store.upsert_record(
            self.employee_id,
            pending.date,
            pending.kind,
            pending.hours,
        ))?;
        Ok(SessionEvent::RecordSaved { record })
    }

    fn on_store_failure<T>(&mut self, result: EngineResult<T>) -> EngineResult<T> {
        if let Err(e) = &result {
            warn!(employee_id = self.employee_id, error = %e, "Store failure, session reset");
            self.state = SessionState::Idle;
        }
        result
    }
}
