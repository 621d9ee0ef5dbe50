pub mod answer_dto;
pub mod candidate_dto;
pub mod exam_dto;
pub mod payment_dto;
pub mod result_dto;
