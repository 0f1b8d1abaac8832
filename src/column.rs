use crate::error::PipelineError;

use csv::StringRecord;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Selects a column either by zero-based position or by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Index(usize),
    Name(String),
}

impl Column {
    pub fn resolve(&self, header: Option<&StringRecord>) -> Result<usize, PipelineError> {
        match self {
            Column::Index(index) => Ok(*index),
            Column::Name(name) => header
                .and_then(|h| h.iter().position(|field| field == name))
                .ok_or_else(|| PipelineError::UnknownColumn(name.clone())),
        }
    }
}

impl FromStr for Column {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<usize>() {
            Ok(index) => Column::Index(index),
            Err(_) => Column::Name(s.to_string()),
        })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Index(index) => write!(f, "{}", index),
            Column::Name(name) => write!(f, "{}", name),
        }
    }
}
