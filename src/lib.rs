pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::services::{
    answer_service::AnswerService, candidate_service::CandidateService, exam_service::ExamService,
    material_service::MaterialService, notification_service::NotificationService,
    payment_service::PaymentService, question_service::QuestionService,
    result_service::ResultService, scoring_service::ScoringService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub uploads_dir: String,
    pub exam_service: ExamService,
    pub question_service: QuestionService,
    pub candidate_service: CandidateService,
    pub answer_service: AnswerService,
    pub scoring_service: ScoringService,
    pub result_service: ResultService,
    pub notification_service: NotificationService,
    pub material_service: MaterialService,
    pub payment_service: PaymentService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap();

        let exam_service = ExamService::new(pool.clone());
        let question_service = QuestionService::new(pool.clone());
        let candidate_service = CandidateService::new(pool.clone());
        let answer_service = AnswerService::new(pool.clone());
        let scoring_service = ScoringService::new(pool.clone());
        let result_service = ResultService::new(pool.clone());
        let notification_service = NotificationService::new(pool.clone());
        let material_service = MaterialService::new(pool.clone(), config.uploads_dir.clone());
        let payment_service = PaymentService::new(
            pool.clone(),
            http_client,
            config.payment_base_url.clone(),
            config.payment_key_id.clone(),
            config.payment_key_secret.clone(),
            config.payment_currency.clone(),
        );

        Self {
            pool,
            uploads_dir: config.uploads_dir.clone(),
            exam_service,
            question_service,
            candidate_service,
            answer_service,
            scoring_service,
            result_service,
            notification_service,
            material_service,
            payment_service,
        }
    }
}
