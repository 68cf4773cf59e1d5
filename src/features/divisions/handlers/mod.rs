pub mod division_handler;

pub use division_handler::{
    __path_fuzzy_search, __path_get_division, __path_status, fuzzy_search, get_division, status,
};
