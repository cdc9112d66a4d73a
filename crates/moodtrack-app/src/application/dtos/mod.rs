mod check_in_dto;
mod consistency_dto;

pub use check_in_dto::CheckInDto;
pub use consistency_dto::*;
