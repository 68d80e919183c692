//! Messages of the `streakai.StreakAiService` identity API.

#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginRequest {
    #[prost(string, tag = "1")]
    pub username: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginResponse {
    #[prost(string, tag = "1")]
    pub token: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RegisterRequest {
    #[prost(string, tag = "1")]
    pub username: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RegisterResponse {
    #[prost(string, tag = "1")]
    pub status: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LogOutRequest {
    #[prost(string, tag = "1")]
    pub username: String,
    #[prost(string, tag = "2")]
    pub auth_code: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LogOutResponse {
    #[prost(string, tag = "1")]
    pub status: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CheckAuthorizedReq {
    #[prost(string, tag = "1")]
    pub auth_code: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CheckAuthorizedResp {
    #[prost(string, tag = "1")]
    pub username: String,
    #[prost(bool, tag = "2")]
    pub authorized: bool,
}
