use log::debug;

use crate::error::{Error, Result};
use crate::models::{AttributePatch, DeviceSnapshot, Hub, Sensor};
use crate::session;
use crate::{HUB_URL, UPDATE_URL};

/// Battery sensor id reported while the diffuser is charging.
const CHARGING_SENSOR_ID: i64 = 21;
/// Cartridge sensor id reported when no cartridge is loaded.
const NO_CARTRIDGE_SENSOR_ID: i64 = 19;

/// One Perfume Genie diffuser, wrapped around its last-fetched snapshot.
///
/// All readings are derived from the snapshot on each access and never touch
/// the network. Mutations post to the cloud and deliberately leave the
/// snapshot alone; [`update_data`](Self::update_data) is the only way to see
/// server-confirmed state.
pub struct Diffuser {
    data: DeviceSnapshot,
    session: Option<reqwest::Client>,
}

impl Diffuser {
    /// Wrap a snapshot, typically one element of the device-listing
    /// response. The session, if given, becomes the default transport.
    pub fn new(data: DeviceSnapshot, session: Option<reqwest::Client>) -> Self {
        Self { data, session }
    }

    /// The full last-known snapshot.
    pub fn data(&self) -> &DeviceSnapshot {
        &self.data
    }

    fn hub(&self) -> &Hub {
        &self.data.hub
    }

    fn battery(&self) -> Result<&Sensor> {
        require(self.hub().sensors.battc.as_ref(), "sensor battc")
    }

    fn wifi(&self) -> Result<&Sensor> {
        require(self.hub().sensors.wific.as_ref(), "sensor wific")
    }

    fn cartridge(&self) -> Result<&Sensor> {
        require(self.hub().sensors.rfidc.as_ref(), "sensor rfidc")
    }

    /// Opaque per-device identifier used in the fetch and update paths.
    pub fn hash(&self) -> &str {
        &self.hub().hash
    }

    /// Device lot number.
    pub fn hublot(&self) -> &str {
        &self.hub().hublot
    }

    /// Whether the diffuser is connected to the cloud.
    pub fn is_online(&self) -> bool {
        self.hub().status == 1
    }

    /// Whether the diffuser fan is running.
    pub fn is_on(&self) -> Result<bool> {
        let fanc = require(self.hub().attributes.fanc.as_deref(), "attribute fanc")?;
        Ok(fanc == "1")
    }

    /// Whether this unit has a battery at all. Mains-powered units report
    /// no battery sensor, which is valid rather than an error.
    pub fn has_battery(&self) -> bool {
        self.hub().sensors.battc.is_some()
    }

    /// Whether the battery is currently charging.
    pub fn charging(&self) -> Result<bool> {
        Ok(self.battery()?.id == CHARGING_SENSOR_ID)
    }

    /// Approximate battery charge.
    ///
    /// Keyed on the icon filename; titles are localized and subject to
    /// change. The filename does not track the drawn charge level.
    pub fn battery_percentage(&self) -> Result<u8> {
        let icon = self.battery()?.icon.as_str();
        match icon {
            "battery-charge.png" | "battery-full.png" => Ok(100),
            "Battery-75.png" => Ok(50),
            "battery-50.png" => Ok(25),
            "battery-low.png" => Ok(10),
            other => Err(Error::Snapshot(format!(
                "unrecognized battery icon: {other}"
            ))),
        }
    }

    /// Wifi signal strength, keyed on the icon filename like
    /// [`battery_percentage`](Self::battery_percentage).
    pub fn wifi_percentage(&self) -> Result<u8> {
        let icon = self.wifi()?.icon.as_str();
        match icon {
            "icon-signal.png" => Ok(100),
            "icon-signal-75.png" => Ok(75),
            "icon-signal-low.png" => Ok(25),
            "icon-signal-0.png" => Ok(0),
            other => Err(Error::Snapshot(format!("unrecognized wifi icon: {other}"))),
        }
    }

    /// Whether a fragrance cartridge is loaded.
    pub fn has_cartridge(&self) -> Result<bool> {
        Ok(self.cartridge()?.id != NO_CARTRIDGE_SENSOR_ID)
    }

    /// Display name of the loaded perfume.
    pub fn perfume(&self) -> Result<&str> {
        Ok(&self.cartridge()?.title)
    }

    /// Display label of the cartridge fill level.
    pub fn fill(&self) -> Result<&str> {
        Ok(&require(self.hub().sensors.fillc.as_ref(), "sensor fillc")?.title)
    }

    /// Fragrance intensity, 1 to 3.
    pub fn perfume_amount(&self) -> Result<u8> {
        parse_attribute(self.hub().attributes.speedc.as_deref(), "speedc")
    }

    /// Room-size calibration code, 1 to 4.
    pub fn room_size(&self) -> Result<u8> {
        parse_attribute(self.hub().attributes.roomc.as_deref(), "roomc")
    }

    /// Room-size calibration expressed in square meters.
    pub fn room_size_square_meter(&self) -> Result<u16> {
        match self.room_size()? {
            1 => Ok(15),
            2 => Ok(30),
            3 => Ok(60),
            4 => Ok(100),
            other => Err(Error::Snapshot(format!(
                "room size code out of range: {other}"
            ))),
        }
    }

    /// User-assigned room name.
    pub fn name(&self) -> Result<&str> {
        require(self.hub().attributes.roomnamec.as_deref(), "attribute roomnamec")
    }

    /// Firmware version.
    pub fn version(&self) -> Result<&str> {
        require(self.hub().sensors.versionc.as_deref(), "sensor versionc")
    }

    /// Refresh the snapshot with the stored session and default endpoint.
    pub async fn update_data(&mut self) -> Result<()> {
        self.update_data_with(None, None).await
    }

    /// Refresh the snapshot, optionally overriding the session and
    /// endpoint. On any failure the previous snapshot is kept.
    pub async fn update_data_with(
        &mut self,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
    ) -> Result<()> {
        let session = session::resolve(session, self.session.as_ref())?;
        let url = format!("{}/{}", url.unwrap_or(HUB_URL), self.hash());

        debug!("Refreshing diffuser {}", self.hash());

        let response = session.get(&url).send().await?.error_for_status()?;
        let response_text = response.text().await?;
        self.data = serde_json::from_str(&response_text)?;
        Ok(())
    }

    /// Turn the diffuser on.
    pub async fn turn_on(&self) -> Result<()> {
        self.turn_on_with(None, None).await
    }

    pub async fn turn_on_with(
        &self,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
    ) -> Result<()> {
        self.send_patch(session, url, AttributePatch::power_on())
            .await
    }

    /// Turn the diffuser off.
    pub async fn turn_off(&self) -> Result<()> {
        self.turn_off_with(None, None).await
    }

    pub async fn turn_off_with(
        &self,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
    ) -> Result<()> {
        self.send_patch(session, url, AttributePatch::power_off())
            .await
    }

    /// Set the fragrance intensity. `amount` must be between 1 and 3
    /// inclusive; anything else fails before a request is made.
    pub async fn set_perfume_amount(&self, amount: u8) -> Result<()> {
        self.set_perfume_amount_with(amount, None, None).await
    }

    pub async fn set_perfume_amount_with(
        &self,
        amount: u8,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
    ) -> Result<()> {
        if !(1..=3).contains(&amount) {
            return Err(Error::Validation(format!(
                "perfume amount must be between 1 and 3 inclusive, got {amount}"
            )));
        }
        self.send_patch(session, url, AttributePatch::perfume_amount(amount))
            .await
    }

    /// Set the room-size calibration code. `size` must be between 1 and 4
    /// inclusive; anything else fails before a request is made.
    pub async fn set_room_size(&self, size: u8) -> Result<()> {
        self.set_room_size_with(size, None, None).await
    }

    pub async fn set_room_size_with(
        &self,
        size: u8,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
    ) -> Result<()> {
        if !(1..=4).contains(&size) {
            return Err(Error::Validation(format!(
                "room size must be between 1 and 4 inclusive, got {size}"
            )));
        }
        self.send_patch(session, url, AttributePatch::room_size(size))
            .await
    }

    /// Set the room-size calibration by area. `square_meters` must be one
    /// of 15, 30, 60 or 100; the value is translated to the matching code
    /// and sent through [`set_room_size`](Self::set_room_size).
    pub async fn set_room_size_square_meter(&self, square_meters: u16) -> Result<()> {
        self.set_room_size_square_meter_with(square_meters, None, None)
            .await
    }

    pub async fn set_room_size_square_meter_with(
        &self,
        square_meters: u16,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
    ) -> Result<()> {
        let size = match square_meters {
            15 => 1,
            30 => 2,
            60 => 3,
            100 => 4,
            other => {
                return Err(Error::Validation(format!(
                    "room size must be 15, 30, 60 or 100 square meters, got {other}"
                )))
            }
        };
        self.set_room_size_with(size, session, url).await
    }

    async fn send_patch(
        &self,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
        patch: AttributePatch,
    ) -> Result<()> {
        let session = session::resolve(session, self.session.as_ref())?;
        let url = url.unwrap_or(UPDATE_URL);
        let json = serde_json::to_string(&patch)?;

        debug!("Sending attribute patch to {}: {}", self.hash(), json);

        let params = [("hub", self.hash()), ("json", json.as_str())];
        session
            .post(url)
            .form(&params)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn require<'a, T>(value: Option<&'a T>, name: &str) -> Result<&'a T>
where
    T: ?Sized,
{
    value.ok_or_else(|| Error::Snapshot(format!("snapshot missing {name}")))
}

fn parse_attribute(value: Option<&str>, name: &str) -> Result<u8> {
    let raw = require(value, &format!("attribute {name}"))?;
    raw.parse()
        .map_err(|_| Error::Snapshot(format!("attribute {name} is not an integer: {raw:?}")))
}
