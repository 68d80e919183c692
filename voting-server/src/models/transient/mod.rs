pub mod authenticated_identity;
