mod mock_sms_sender;
mod twilio_sms_sender;

pub use mock_sms_sender::{MockSmsSender, SentSms};
pub use twilio_sms_sender::TwilioSmsSender;
