pub mod answer;
pub mod candidate;
pub mod exam;
pub mod material;
pub mod notification;
pub mod payment;
pub mod question;
pub mod result;
