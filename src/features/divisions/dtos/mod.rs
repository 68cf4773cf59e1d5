pub mod division_dto;

pub use division_dto::{
    DivisionChildDto, DivisionQuery, DivisionResponseDto, FuzzyHitDto, FuzzyQuery, LocationDto,
};
