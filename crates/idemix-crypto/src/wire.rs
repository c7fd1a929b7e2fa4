//! Protobuf messages for engine objects. Points travel as fixed-width
//! big-endian affine coordinates; scalars as 32-byte big-endian values.

#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct Ecp {
    #[prost(bytes = "vec", tag = "1")]
    pub x: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub y: Vec<u8>,
}

/// G2 point: `x = xa + xb·u`, `y = ya + yb·u`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct Ecp2 {
    #[prost(bytes = "vec", tag = "1")]
    pub xa: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub xb: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub ya: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub yb: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct IssuerPublicKeyWire {
    #[prost(string, repeated, tag = "1")]
    pub attribute_names: Vec<String>,
    #[prost(message, optional, tag = "2")]
    pub h_sk: Option<Ecp>,
    #[prost(message, optional, tag = "3")]
    pub h_rand: Option<Ecp>,
    #[prost(message, repeated, tag = "4")]
    pub h_attrs: Vec<Ecp>,
    #[prost(message, optional, tag = "5")]
    pub w: Option<Ecp2>,
    #[prost(message, optional, tag = "6")]
    pub bar_g1: Option<Ecp>,
    #[prost(message, optional, tag = "7")]
    pub bar_g2: Option<Ecp>,
    #[prost(bytes = "vec", tag = "8")]
    pub proof_c: Vec<u8>,
    #[prost(bytes = "vec", tag = "9")]
    pub proof_s: Vec<u8>,
    #[prost(bytes = "vec", tag = "10")]
    pub hash: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct CredRequestWire {
    #[prost(message, optional, tag = "1")]
    pub nym: Option<Ecp>,
    #[prost(bytes = "vec", tag = "2")]
    pub issuer_nonce: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub proof_c: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub proof_s: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct CredentialWire {
    #[prost(message, optional, tag = "1")]
    pub a: Option<Ecp>,
    #[prost(message, optional, tag = "2")]
    pub b: Option<Ecp>,
    #[prost(bytes = "vec", tag = "3")]
    pub e: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub s: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "5")]
    pub attrs: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct SignatureWire {
    #[prost(message, optional, tag = "1")]
    pub a_prime: Option<Ecp>,
    #[prost(message, optional, tag = "2")]
    pub a_bar: Option<Ecp>,
    #[prost(message, optional, tag = "3")]
    pub b_prime: Option<Ecp>,
    #[prost(bytes = "vec", tag = "4")]
    pub proof_c: Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    pub proof_s_sk: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    pub proof_s_e: Vec<u8>,
    #[prost(bytes = "vec", tag = "7")]
    pub proof_s_r2: Vec<u8>,
    #[prost(bytes = "vec", tag = "8")]
    pub proof_s_r3: Vec<u8>,
    #[prost(bytes = "vec", tag = "9")]
    pub proof_s_s_prime: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "10")]
    pub proof_s_attrs: Vec<Vec<u8>>,
    #[prost(bytes = "vec", tag = "11")]
    pub nonce: Vec<u8>,
    #[prost(message, optional, tag = "12")]
    pub nym: Option<Ecp>,
    #[prost(bytes = "vec", tag = "13")]
    pub proof_s_r_nym: Vec<u8>,
}
