//! Access-token types shared by the api service (issuer) and the realtime
//! gateway (validator).

pub mod token;
