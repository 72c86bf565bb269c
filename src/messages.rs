// Author: Jacques Murray

//! Fixed strings shown to users and carried by classified errors.

/// Shown when a failure cannot be described more precisely.
pub const DEFAULT: &str = "죄송합니다. 응답을 생성하는 중 오류가 발생했습니다.";

/// Shown when the backend answered with a 5xx status.
pub const SERVER_ERROR: &str = "서버에 일시적인 문제가 발생했습니다. 잠시 후 다시 시도해주세요.";

/// Shown when the backend answered with 429 Too Many Requests.
pub const RATE_LIMIT: &str = "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.";

/// Placeholder while an answer is being generated.
pub const LOADING: &str = "답변을 생성하고 있습니다...";

/// Classified message for a request that was sent but never answered.
pub const CONNECTIVITY_MESSAGE: &str =
    "No response from the server. Please check your connection and try again.";

/// Classified message for a failure before the request could be dispatched.
pub const GENERIC_MESSAGE: &str = "Failed to send message. Please try again.";
