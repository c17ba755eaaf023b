//! TTS Adapter - 上游语音合成服务实现

mod azure_speech_client;
mod azure_token;
mod factory;
mod fake_tts_client;
mod google_translate_client;
mod upstream;
mod workers_ai_client;

pub use azure_speech_client::{AzureSpeechClient, AzureSpeechClientConfig};
pub use azure_token::{IssuedToken, TokenSource};
pub use factory::build_provider;
pub use fake_tts_client::{FakeTtsClient, FakeTtsClientConfig};
pub use google_translate_client::{GoogleTranslateClient, GoogleTranslateClientConfig};
pub use workers_ai_client::{WorkersAiClient, WorkersAiClientConfig};
