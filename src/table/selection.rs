/// Which columns of a table a join should take
///
/// A name selects every column whose key name equals it, so one gene symbol
/// can select several Database_IDs or phosphosites.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelection {
    /// Every column
    #[default]
    All,
    /// Columns whose key name is in the list
    Names(Vec<String>),
}

impl ColumnSelection {
    /// Selection of the given names
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelection::Names(names.into_iter().map(Into::into).collect())
    }

    /// Parse a comma separated CLI argument; `None` means every column.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => ColumnSelection::All,
            Some(s) => ColumnSelection::names(
                s.split(',').map(str::trim).filter(|n| !n.is_empty()),
            ),
        }
    }
}

impl From<&str> for ColumnSelection {
    fn from(name: &str) -> Self {
        ColumnSelection::Names(vec![name.to_string()])
    }
}

impl From<String> for ColumnSelection {
    fn from(name: String) -> Self {
        ColumnSelection::Names(vec![name])
    }
}

impl From<Vec<String>> for ColumnSelection {
    fn from(names: Vec<String>) -> Self {
        ColumnSelection::Names(names)
    }
}

impl From<Vec<&str>> for ColumnSelection {
    fn from(names: Vec<&str>) -> Self {
        ColumnSelection::names(names)
    }
}

impl From<&[&str]> for ColumnSelection {
    fn from(names: &[&str]) -> Self {
        ColumnSelection::names(names.iter().copied())
    }
}

/// One column picked by a [`ColumnSelection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedColumn {
    /// Position of an existing column
    Existing(usize),
    /// Requested name with no matching column; filled with missing values
    Imputed(String),
}
