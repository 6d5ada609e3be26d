/// A raw source table: ordered header names and rows of optional cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Returns the name of the first candidate present in the table, compared
    /// case-insensitively. When none is present, a column named after the first
    /// candidate is appended with every cell missing, and that name is returned.
    pub fn resolve_column(&mut self, candidates: &[&str]) -> String {
        for candidate in candidates {
            let wanted = candidate.to_lowercase();
            if let Some(found) = self
                .headers
                .iter()
                .find(|header| header.trim().to_lowercase() == wanted)
            {
                return found.clone();
            }
        }

        let name = candidates.first().copied().unwrap_or("unnamed").to_string();
        self.headers.push(name.clone());
        for row in self.rows.iter_mut() {
            row.push(None);
        }
        name
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_deref())
    }
}

/// Logical input fields, each accepted under a bounded list of historical spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    LastCallCode,
    LastCallReason,
    TotalTries,
    LastTryTime,
    ImportCreatedOn,
    CloseReason,
    RecordState,
    EndReason,
    DisconnectReason,
    DisconnectCause,
}

impl Field {
    pub const COUNT: usize = 11;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Id,
        Field::LastCallCode,
        Field::LastCallReason,
        Field::TotalTries,
        Field::LastTryTime,
        Field::ImportCreatedOn,
        Field::CloseReason,
        Field::RecordState,
        Field::EndReason,
        Field::DisconnectReason,
        Field::DisconnectCause,
    ];

    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Field::Id => &["Id", "RecordId", "Identyfikator"],
            Field::LastCallCode => &["LastCallCode", "Last Call Code", "CallCode"],
            Field::LastCallReason => &["LastCallReason", "Last Call Reason"],
            Field::TotalTries => &["TotalTries", "Total Tries", "Tries"],
            Field::LastTryTime => &["LastTryTime", "Last Try Time", "LastCallTime"],
            Field::ImportCreatedOn => &["ImportCreatedOn", "Import Created On", "CreatedOn"],
            Field::CloseReason => &["CloseReason", "Close Reason"],
            Field::RecordState => &["RecordState", "Record State", "State"],
            Field::EndReason => &["EndReason", "End Reason"],
            Field::DisconnectReason => &["DisconnectReason", "Disconnect Reason"],
            Field::DisconnectCause => &["DisconnectCause", "Disconnect Cause", "HangupCause"],
        }
    }

    /// True when `header` is any accepted spelling of any field.
    pub fn is_known_header(header: &str) -> bool {
        let header = header.trim().to_lowercase();
        Field::ALL.iter().any(|field| {
            field
                .candidates()
                .iter()
                .any(|candidate| candidate.to_lowercase() == header)
        })
    }
}

/// Column indices for every logical field, resolved once per table.
#[derive(Debug, Clone)]
pub struct ResolvedColumns {
    indices: [usize; Field::COUNT],
    pub synthesized: Vec<String>,
}

impl ResolvedColumns {
    pub fn resolve(table: &mut Table) -> Self {
        let mut indices = [0usize; Field::COUNT];
        let mut synthesized = Vec::new();
        let original_width = table.headers.len();

        for field in Field::ALL {
            let name = table.resolve_column(field.candidates());
            // resolve_column always leaves `name` in the header list
            let index = table.column_index(&name).unwrap_or(original_width);
            if index >= original_width {
                synthesized.push(name);
            }
            indices[field as usize] = index;
        }

        Self {
            indices,
            synthesized,
        }
    }

    pub fn index(&self, field: Field) -> usize {
        self.indices[field as usize]
    }
}
