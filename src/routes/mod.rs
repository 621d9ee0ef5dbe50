pub mod answer_routes;
pub mod candidate_routes;
pub mod exam_routes;
pub mod health;
pub mod material_routes;
pub mod notification_routes;
pub mod payment_routes;
pub mod result_routes;
