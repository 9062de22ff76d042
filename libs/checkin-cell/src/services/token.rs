// libs/checkin-cell/src/services/token.rs
use std::sync::Arc;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Luma};
use qrcode::{EcLevel, QrCode};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use shared_models::domain::{Appointment, Patient};
use shared_storage::{AppState, ClinicStore};

use crate::models::{CheckinError, CheckinPayload, MintedToken, Verification};

/// Pixels per QR module, matched to the scanner optics on the check-in
/// terminals.
const MODULE_PIXELS: u32 = 10;

/// Digest length in hex characters as the terminals expect it.
const DIGEST_LEN: usize = 16;

/// Mints and verifies the QR tokens scanned at the clinic check-in terminal.
/// Minting and verification are pure functions of the payload fields and the
/// shared secret; they hold no locks and run freely in parallel.
pub struct CheckinTokenService {
    store: Arc<dyn ClinicStore>,
    secret: String,
}

impl CheckinTokenService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            secret: state.config.checkin_secret.clone(),
        }
    }

    /// First 16 hex characters of SHA-256 over the colon-joined fields and
    /// the shared secret. A keyed hash, not an HMAC: the deployed terminals
    /// compute exactly this, so the construction must not change.
    fn digest(&self, appt_id: i64, cpf: &str, name: &str) -> String {
        let base = format!("checkin:{}:{}:{}:{}", appt_id, cpf, name, self.secret);
        let full = hex::encode(Sha256::digest(base.as_bytes()));
        full[..DIGEST_LEN].to_string()
    }

    /// Looks up the appointment and its patient, then mints. The
    /// appointment's status is not consulted here; what to do with a token
    /// for a cancelled appointment is the terminal's policy.
    pub async fn mint_for_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<MintedToken, CheckinError> {
        let appointment = self
            .store
            .find_appointment(appointment_id)
            .await?
            .ok_or(CheckinError::AppointmentNotFound)?;

        let patient = self
            .store
            .find_patient(appointment.patient_id)
            .await?
            .ok_or(CheckinError::PatientNotFound)?;

        self.mint(&appointment, &patient)
    }

    /// Builds the stamped payload and renders it as a PNG QR image.
    pub fn mint(
        &self,
        appointment: &Appointment,
        patient: &Patient,
    ) -> Result<MintedToken, CheckinError> {
        if self.secret.is_empty() {
            // A token minted without the secret would be rejected by every
            // terminal in the field; refuse loudly instead.
            return Err(CheckinError::SecretMissing);
        }

        let payload = CheckinPayload {
            cmd: "checkin".to_string(),
            appt_id: appointment.id,
            cpf: patient.cpf.clone(),
            name: patient.name.clone(),
            hash: self.digest(appointment.id, &patient.cpf, &patient.name),
        };

        let text = serde_json::to_string(&payload)
            .map_err(|e| CheckinError::Render(format!("payload serialization failed: {}", e)))?;
        let png = render_qr_png(&text)?;

        info!(
            "Minted check-in token for appointment {} ({} byte PNG)",
            appointment.id,
            png.len()
        );

        Ok(MintedToken { payload, text, png })
    }

    /// Verification as the offline terminal performs it: parse the scanned
    /// text, recompute the digest over the non-hash fields, compare. Fails
    /// closed: malformed input yields `valid = false` with a reason, never
    /// an error.
    pub fn verify(&self, raw_text: &str) -> Verification {
        let value: serde_json::Value = match serde_json::from_str(raw_text) {
            Ok(v) => v,
            Err(e) => return Verification::rejected(format!("payload is not valid JSON: {}", e)),
        };

        let cmd = match value.get("cmd").and_then(|v| v.as_str()) {
            Some(c) => c,
            None => return Verification::rejected("missing field: cmd"),
        };
        if cmd != "checkin" {
            return Verification::rejected(format!("unexpected command: {}", cmd));
        }

        let appt_id = match value.get("appt_id").and_then(|v| v.as_i64()) {
            Some(id) => id,
            None => return Verification::rejected("missing or non-integer field: appt_id"),
        };
        let cpf = match value.get("cpf").and_then(|v| v.as_str()) {
            Some(c) => c,
            None => return Verification::rejected("missing field: cpf"),
        };
        let name = match value.get("name").and_then(|v| v.as_str()) {
            Some(n) => n,
            None => return Verification::rejected("missing field: name"),
        };
        let hash = match value.get("hash").and_then(|v| v.as_str()) {
            Some(h) => h,
            None => return Verification::rejected("missing field: hash"),
        };

        if hash != self.digest(appt_id, cpf, name) {
            warn!("Check-in digest mismatch for appointment {}", appt_id);
            return Verification::rejected("digest mismatch");
        }

        debug!("Check-in token verified for appointment {}", appt_id);
        Verification::ok()
    }
}

/// Error-correction level M, black on white, with the standard 4-module
/// quiet zone.
fn render_qr_png(text: &str) -> Result<Vec<u8>, CheckinError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)
        .map_err(|e| CheckinError::Render(format!("QR encoding failed: {}", e)))?;

    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .build();

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
        )
        .map_err(|e| CheckinError::Render(format!("PNG encoding failed: {}", e)))?;

    Ok(png)
}
