#![cfg(test)]

mod helpers;
mod test_http_client;
