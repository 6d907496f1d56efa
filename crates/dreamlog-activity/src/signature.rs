//! 컴패니언 문구 목록.
//!
//! 고정된 순서의 문구 목록에서 하나를 균등 확률로 고른다.

use rand::seq::IndexedRandom;

/// 기본 문구 목록 (읽기 전용)
pub const SIGNATURES: &[&str] = &[
    "꿈은 잠든 마음이 쓰는 편지",
    "달빛이 창가에 머무는 동안",
    "어젯밤의 바다를 기억하나요",
    "별 하나에 이야기 하나",
    "잠결에 스친 이름을 적어두세요",
    "구름 위를 걷던 발자국",
    "새벽은 꿈의 마지막 페이지",
    "눈을 감으면 열리는 문",
    "아직 식지 않은 꿈의 온기",
    "밤새 다녀온 먼 나라",
    "희미해지기 전에, 한 줄만",
    "베개 밑에 숨겨둔 이야기",
    "꿈속의 길은 언제나 처음",
    "잊혀질 장면을 붙잡는 시간",
    "고요한 밤, 조용한 기록",
    "당신의 밤은 어떤 색이었나요",
    "깨어나도 남아 있는 목소리",
    "물결처럼 흩어지는 기억",
    "잠과 깸 사이의 작은 틈",
    "오늘의 꿈이 내일의 단서",
    "숲속 오두막의 불빛",
    "기차가 지나간 꿈의 역",
    "날개 없이 날던 밤",
    "어린 시절의 골목으로",
    "꿈은 기록될 때 자란다",
    "달의 뒷면에서 보낸 엽서",
    "안개 속에서 들린 노래",
    "한밤의 도서관, 펼쳐진 책",
    "다시 꾸고 싶은 꿈이 있나요",
    "잘 자요, 그리고 기억해요",
];

/// 문구 목록이 비었을 때의 기본 문구
pub const DEFAULT_FALLBACK: &str = "오늘 밤도 좋은 꿈 꾸세요";

/// 컴패니언 문구 소스
#[derive(Debug, Clone)]
pub struct SignatureSource {
    signatures: Vec<String>,
    fallback: String,
}

impl SignatureSource {
    /// 지정한 문구 목록으로 생성
    pub fn new<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            signatures: signatures.into_iter().map(Into::into).collect(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }

    /// 기본 문구 교체
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// 무작위 문구 하나 선택 (목록이 비면 기본 문구)
    pub fn pick(&self) -> String {
        self.signatures
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// 목록 또는 기본 문구에 포함되는지
    pub fn contains(&self, signature: &str) -> bool {
        signature == self.fallback || self.signatures.iter().any(|s| s == signature)
    }

    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for SignatureSource {
    fn default() -> Self {
        Self::new(SIGNATURES.iter().copied())
    }
}
