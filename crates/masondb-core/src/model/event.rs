use std::rc::Rc;

///
/// ModelEvent
///
/// Lifecycle notifications fired around mutating statements, inside the
/// transaction: a begin event after the transaction opens, an after event
/// once the statement executed, before commit.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModelEvent {
    InsertBegin { table: String, sql: String },
    InsertAfter { table: String, sql: String },
    UpdateBegin { table: String, sql: String },
    UpdateAfter { table: String, sql: String },
    DeleteBegin { table: String, sql: String },
    DeleteAfter { table: String, sql: String },
}

impl ModelEvent {
    #[must_use]
    pub const fn table(&self) -> &String {
        match self {
            Self::InsertBegin { table, .. }
            | Self::InsertAfter { table, .. }
            | Self::UpdateBegin { table, .. }
            | Self::UpdateAfter { table, .. }
            | Self::DeleteBegin { table, .. }
            | Self::DeleteAfter { table, .. } => table,
        }
    }
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: &ModelEvent);
}

///
/// RecordingSink
/// Accumulating sink for tests and audit surfaces.
///

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::cell::RefCell<Vec<ModelEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    #[must_use]
    pub fn drain(&self) -> Vec<ModelEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &ModelEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
