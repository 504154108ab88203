// Client-facing response messages. The mobile client matches on these
// strings, so they stay in Korean and must not change.

pub const REQUEST_OK: &str = "데이터 요청 성공";
pub const REQUEST_FAILED: &str = "데이터 요청 실패";
pub const REQUEST_REJECTED: &str = "요청이 거부됨";
pub const SAVE_OK: &str = "데이터 저장 성공";
pub const REMOVE_OK: &str = "데이터 제거 성공";
pub const SEARCH_FAILED: &str = "검색 중 오류 발생";

pub const USER_AUTHENTICATED: &str = "User authenticated";
pub const INVALID_TOKEN: &str = "Invalid token";
