//! DreamLog 도메인 모델.
//!
//! 라이브 액티비티 호스트와 코디네이터 사이에서 주고받는 데이터 구조체를 정의한다.

pub mod activity;
