pub mod answer_service;
pub mod candidate_service;
pub mod exam_service;
pub mod material_service;
pub mod notification_service;
pub mod payment_service;
pub mod question_service;
pub mod result_service;
pub mod scoring_service;
