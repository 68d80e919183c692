use super::{
    IdentityService,
    proto::{
        CheckAuthorizedReq, CheckAuthorizedResp, LogOutRequest, LogOutResponse, LoginRequest,
        LoginResponse, RegisterRequest, RegisterResponse,
    },
};
use crate::models::transient::authenticated_identity::AuthenticatedIdentity;
use async_trait::async_trait;
use log::trace;
use tonic::{
    Request, Status,
    client::Grpc,
    codec::ProstCodec,
    codegen::http::uri::PathAndQuery,
    transport::{Channel, Endpoint},
};

const LOGIN_PATH: &str = "/streakai.StreakAiService/Login";
const REGISTER_PATH: &str = "/streakai.StreakAiService/Register";
const LOG_OUT_PATH: &str = "/streakai.StreakAiService/LogOut";
const CHECK_AUTHORIZED_PATH: &str = "/streakai.StreakAiService/CheckAuthorized";

/// gRPC client for the identity service. The channel connects on first use,
/// so the server starts even while the identity service is still booting.
#[derive(Debug, Clone)]
pub struct GrpcIdentity {
    inner: Grpc<Channel>,
}

impl GrpcIdentity {
    pub fn connect_lazy(url: &str) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(url.to_string())?.connect_lazy();
        Ok(GrpcIdentity {
            inner: Grpc::new(channel),
        })
    }

    async fn unary<M1, M2>(&self, path: &'static str, message: M1) -> Result<M2, Status>
    where
        M1: prost::Message + Send + Sync + 'static,
        M2: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|error| Status::unknown(format!("Service was not ready: {error}")))?;

        trace!("gRPC call {path}");
        let codec = ProstCodec::<M1, M2>::default();
        let response = grpc
            .unary(Request::new(message), PathAndQuery::from_static(path), codec)
            .await?;

        Ok(response.into_inner())
    }
}

#[async_trait]
impl IdentityService for GrpcIdentity {
    async fn login(&self, username: &str, password: &str) -> Result<String, Status> {
        let response: LoginResponse = self
            .unary(
                LOGIN_PATH,
                LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        Ok(response.token)
    }

    async fn register(&self, username: &str, password: &str) -> Result<String, Status> {
        let response: RegisterResponse = self
            .unary(
                REGISTER_PATH,
                RegisterRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        Ok(response.status)
    }

    async fn log_out(&self, username: &str, auth_code: &str) -> Result<String, Status> {
        let response: LogOutResponse = self
            .unary(
                LOG_OUT_PATH,
                LogOutRequest {
                    username: username.to_string(),
                    auth_code: auth_code.to_string(),
                },
            )
            .await?;

        Ok(response.status)
    }

    async fn check_authorized(&self, auth_code: &str) -> Result<AuthenticatedIdentity, Status> {
        let response: CheckAuthorizedResp = self
            .unary(
                CHECK_AUTHORIZED_PATH,
                CheckAuthorizedReq {
                    auth_code: auth_code.to_string(),
                },
            )
            .await?;

        Ok(AuthenticatedIdentity::new(
            response.username,
            response.authorized,
        ))
    }
}
