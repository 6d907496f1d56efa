//! # dreamlog-core
//!
//! DreamLog 라이브 액티비티 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 코디네이터 crate와 앱 crate가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 액티비티 상태/핸들 (serde Serialize/Deserialize)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
