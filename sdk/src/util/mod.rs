pub(crate) mod protobuf;
