mod hooks;
mod marshal;
mod oid;
mod record;
