// Interface adapters: RCON gateway client and its wire protocol.

pub mod clients;
pub mod protocol;
