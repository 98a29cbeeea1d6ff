//! Captured device documents and matching profiles for testing.
//!
//! These mirror what the supported device families actually return, trimmed
//! to the elements the profiles reference.

/// Coriant (Infinera) NE reply, already unwrapped to `<data>`.
///
/// One OTS, one OMS and one OSC under `ne/services/optical-interfaces`, plus
/// NE-level temperature and altitude.
pub const CORIANT_REPLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<data xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <ne xmlns="http://coriant.com/yang/os/ne">
    <ne-name>ROADM-AMS-01</ne-name>
    <ne-temperature>28.5</ne-temperature>
    <ne-altitude>152</ne-altitude>
    <services>
      <optical-interfaces>
        <ots>
          <ots-name>OTS-1-1-1</ots-name>
          <alias-name>Line-East-OTS</alias-name>
          <admin-status>up</admin-status>
          <oper-status>up</oper-status>
          <measured-span-loss>18.5</measured-span-loss>
          <fiber-type>SMF-28</fiber-type>
          <fiber-length-tx-derived>85.2</fiber-length-tx-derived>
          <last-change>2024-11-26T14:30:00Z</last-change>
        </ots>
        <oms>
          <oms-name>OMS-1-1-1</oms-name>
          <alias-name>C-Band-East-OMS</alias-name>
          <admin-status>up</admin-status>
          <oper-status>up</oper-status>
          <rx-optical-power>-12.5</rx-optical-power>
          <tx-optical-power>1.2</tx-optical-power>
          <grid-mode>flexible</grid-mode>
          <statistics>
            <in-optical-power>
              <instant>-12.3</instant>
            </in-optical-power>
          </statistics>
        </oms>
        <osc>
          <osc-name>OSC-1-1-1</osc-name>
          <alias-name>OSC-East</alias-name>
          <admin-status>up</admin-status>
          <oper-status>down</oper-status>
          <osc-mode>bidirectional</osc-mode>
          <rx-optical-power>-18.2</rx-optical-power>
          <tx-optical-power>2.1</tx-optical-power>
          <osc-wavelength>1510.0</osc-wavelength>
          <last-change>0000-01-01T00:00:00.000Z</last-change>
        </osc>
      </optical-interfaces>
    </services>
  </ne>
</data>
"#;

/// Ciena WaveServer `ptps` reply, still wrapped in `<rpc-reply>`.
pub const CIENA_REPLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0" message-id="7">
  <data>
    <ptps xmlns="urn:ciena:params:xml:ns:yang:ciena-ws-ptps">
      <ptp kind="line">
        <name>1/1</name>
        <properties>
          <xcvr-type>WaveLogic 5e</xcvr-type>
          <admin-state>enabled</admin-state>
          <oper-state>up</oper-state>
          <tx-actual-frequency>193100</tx-actual-frequency>
        </properties>
        <state>
          <rx-power>-10.42</rx-power>
          <tx-power>0.5</tx-power>
          <pre-fec-ber>1.5E-07</pre-fec-ber>
        </state>
      </ptp>
      <ptp kind="client">
        <name>1/2</name>
        <properties>
          <xcvr-type>QSFP28</xcvr-type>
          <admin-state>enabled</admin-state>
          <oper-state>up</oper-state>
        </properties>
        <state>
          <rx-power>-2.1</rx-power>
          <tx-power>-1.8</tx-power>
        </state>
      </ptp>
      <ptp kind="client">
        <name>2/1</name>
        <properties>
          <admin-state>disabled</admin-state>
          <oper-state>down</oper-state>
        </properties>
        <state>
          <rx-power>-Inf</rx-power>
          <tx-power>n/a</tx-power>
        </state>
      </ptp>
    </ptps>
  </data>
</rpc-reply>
"#;

/// `snmpwalk -On` of a Juniper MX: system group, ifTable and ifXTable columns.
pub const SNMP_WALK: &str = r#".1.3.6.1.2.1.1.1.0 = STRING: "Juniper Networks, Inc. mx480 internet router, kernel JUNOS 21.4R3
Build date: 2023-05-10 12:00:00 UTC"
.1.3.6.1.2.1.1.3.0 = Timeticks: (123456789) 14 days, 6:56:07.89
.1.3.6.1.2.1.1.5.0 = STRING: "edge-ams-01"
.1.3.6.1.2.1.2.2.1.2.513 = STRING: "ge-0/0/0"
.1.3.6.1.2.1.2.2.1.2.514 = STRING: "ge-0/0/1"
.1.3.6.1.2.1.2.2.1.2.600 = STRING: "ae100"
.1.3.6.1.2.1.2.2.1.8.513 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.8.514 = INTEGER: down(2)
.1.3.6.1.2.1.2.2.1.8.600 = INTEGER: up(1)
.1.3.6.1.2.1.31.1.1.1.1.513 = STRING: "ge-0/0/0"
.1.3.6.1.2.1.31.1.1.1.1.514 = STRING: "ge-0/0/1"
.1.3.6.1.2.1.31.1.1.1.1.600 = STRING: "ae100"
.1.3.6.1.2.1.31.1.1.1.6.513 = Counter64: 184467440737
.1.3.6.1.2.1.31.1.1.1.6.514 = Counter64: 0
.1.3.6.1.2.1.31.1.1.1.6.600 = Counter64: 9876543210
.1.3.6.1.2.1.31.1.1.1.15.513 = Gauge32: 1000
.1.3.6.1.2.1.31.1.1.1.15.514 = Gauge32: 1000
.1.3.6.1.2.1.31.1.1.1.15.600 = Gauge32: 20000
.1.3.6.1.2.1.31.1.1.1.18.513 = STRING: "core uplink: to PE1"
.1.3.6.1.2.1.31.1.1.1.18.514 = STRING: ""
.1.3.6.1.2.1.31.1.1.1.18.600 = STRING: "ae100:3 uplink"
"#;

/// Profile for [`CORIANT_REPLY`].
pub const CORIANT_PROFILE: &str = r#"
protocol: netconf
device_type: coriant
chassis:
  metrics:
    - name: temperature
      xpath: ne:ne/ne:ne-temperature
      help: Network element temperature in degrees Celsius
    - name: altitude
      xpath: ne:ne/ne:ne-altitude
interfaces:
  ots:
    xpath: ne:ne/ne:services/ne:optical-interfaces/ne:ots
    primary_key: alias-name
    fallback_id_key: ots-name
    description_key: ots-name
    properties:
      - fiber-type
      - fiber-length-tx-derived
    metrics:
      - name: admin_status
        xpath: admin-status
        string_map: status
      - name: oper_status
        xpath: oper-status
        string_map: status
      - name: span_loss
        xpath: measured-span-loss
      - name: last_change
        xpath: last-change
        parse_timestamp: true
  oms:
    xpath: ne:ne/ne:services/ne:optical-interfaces/ne:oms
    instance_key: alias-name
    fallback_id_key: oms-name
    properties:
      grid_mode: grid-mode
    metrics:
      - name: admin_status
        xpath: admin-status
        string_map: status
      - name: rx_power
        xpath: rx-optical-power
      - name: tx_power
        xpath: tx-optical-power
      - name: in_power_instant
        xpath: statistics/in-optical-power/instant
  osc:
    xpath: ne:ne/ne:services/ne:optical-interfaces/ne:osc
    fallback_id_key: osc-name
    properties: [osc-mode]
    metrics:
      - name: oper_status
        xpath: oper-status
        string_map: {down: 0, up: 1}
      - name: rx_power
        xpath: rx-optical-power
      - name: tx_power
        xpath: tx-optical-power
      - name: wavelength
        xpath: osc-wavelength
      - name: last_change
        xpath: last-change
        parse_timestamp: true
"#;

/// Profile for [`CIENA_REPLY`].
pub const CIENA_PROFILE: &str = r#"
device_type: ciena
interfaces:
  ptp:
    xpath: //ws-ptps:ptps/ws-ptps:ptp
    primary_key: name
    description_key: properties/xcvr-type
    properties:
      kind: "@kind"
    metrics:
      - name: admin_state
        xpath: properties/admin-state
        string_map: enabled
      - name: oper_state
        xpath: properties/oper-state
        string_map: oper_state
      - name: rx_power
        xpath: state/rx-power
      - name: tx_power
        xpath: state/tx-power
      - name: pre_fec_ber
        xpath: state/pre-fec-ber
      - name: tx_frequency_hz
        xpath: properties/tx-actual-frequency
        multiplier: 1000000
"#;

/// SNMP profile for [`SNMP_WALK`]: ifTable rows named by ifAlias, then ifName.
pub const SNMP_PROFILE: &str = r#"
protocol: snmp
device_type: juniper
chassis:
  metrics:
    - name: uptime_ticks
      oid: "1.3.6.1.2.1.1.3.0"
interfaces:
  interface:
    oid: "1.3.6.1.2.1.2.2.1.2"
    primary_key: "1.3.6.1.2.1.31.1.1.1.18"
    fallback_key: "1.3.6.1.2.1.31.1.1.1.1"
    description_key: "1.3.6.1.2.1.2.2.1.2"
    metrics:
      - name: oper_status
        oid: "1.3.6.1.2.1.2.2.1.8"
        string_map: status
      - name: in_octets
        oid: "1.3.6.1.2.1.31.1.1.1.6"
      - name: speed_bps
        oid: "1.3.6.1.2.1.31.1.1.1.15"
        multiplier: 1000000
"#;
