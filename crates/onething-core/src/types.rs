//! Wire types shared with the backend's slice-paginated list endpoints

use serde::{Deserialize, Serialize};

/// Paging request echoed back by the backend
///
/// Spring serializes an unpaged request as the bare string `"INSTANCE"`;
/// that form deserializes to the zero pageable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PageableRepr")]
pub struct Pageable {
    /// Zero-based page index
    pub page_number: u32,
    /// Items per page as requested by the caller
    pub page_size: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageableRepr {
    Paged {
        #[serde(default, rename = "pageNumber")]
        page_number: u32,
        #[serde(default, rename = "pageSize")]
        page_size: u32,
    },
    Unpaged(String),
}

impl From<PageableRepr> for Pageable {
    fn from(repr: PageableRepr) -> Self {
        match repr {
            PageableRepr::Paged {
                page_number,
                page_size,
            } => Self {
                page_number,
                page_size,
            },
            PageableRepr::Unpaged(_) => Self::default(),
        }
    }
}

/// One page of a backend list, without a total count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceEnvelope<T> {
    /// Items in backend order
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,

    /// Requested page
    #[serde(default)]
    pub pageable: Pageable,

    /// True iff this is page zero
    #[serde(default)]
    pub first: bool,

    /// True iff no page follows this one
    #[serde(default)]
    pub last: bool,

    /// True iff `content` is empty
    #[serde(default)]
    pub empty: bool,

    /// Number of items on this page, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_elements: Option<u32>,
}

impl<T> SliceEnvelope<T> {
    /// Build an envelope the way the backend would for `content` at `page_number`
    pub fn new(content: Vec<T>, page_number: u32, page_size: u32, last: bool) -> Self {
        let empty = content.is_empty();
        let number_of_elements = u32::try_from(content.len()).ok();
        Self {
            content,
            pageable: Pageable {
                page_number,
                page_size,
            },
            first: page_number == 0,
            last,
            empty,
            number_of_elements,
        }
    }

    /// Transform every item while keeping the paging metadata
    pub fn map<U, F>(self, f: F) -> SliceEnvelope<U>
    where
        F: FnMut(T) -> U,
    {
        SliceEnvelope {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            first: self.first,
            last: self.last,
            empty: self.empty,
            number_of_elements: self.number_of_elements,
        }
    }
}
