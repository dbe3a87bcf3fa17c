// End-to-end decoding of complete logs through the public API
use imu_log_decoder::{checksum, Channel, Decoder, DecoderConfig, VelocityLabels};
use std::fs::File;
use std::io::{BufReader, Write};

/// Append a correct checksum trailer to a sentence body
fn sentence(body: &str) -> String {
    format!("{},*{:02X}", body, checksum::compute(body))
}

fn ride_log() -> Vec<String> {
    vec![
        sentence("$PCHRH,1000,0,0"),
        sentence("$PCHRG,1001,0.000000,0.000000,0.0,-1.5,2.25,90.0,88.1"),
        sentence("$PCHRG,1002.5,44.056789,-123.086754,135.2,-1.0,2.0,91.0,88.0"),
        "$PCHRR,1003,0.25,-0.75,0.0,0.1,0.2,0.3,*00".to_string(),
        sentence("$PCHRR,1003.25,0.25,-0.75,0.0,0.1,0.2,0.3"),
        sentence("$PCHRS,0,1004,0.4,0.5,0.6"),
        sentence("$PCHRS,1,1004.5,0.01,-0.02,9.81"),
        sentence("$PCHRS,2,1005,0.3,0.4,0.5"),
        sentence("$PCHRS,3,1005.5,1,2,3"),
        sentence("$GPGGA,1006,1,2"),
        sentence("$PCHRS,0,1007"),
        sentence("$PCHRH,1008"),
    ]
}

#[test]
fn test_full_ride_log() {
    let output = Decoder::new().decode_lines(ride_log());
    let summary = &output.summary;

    assert_eq!(summary.total_packets, 12);
    // bad checksum, unrecognized tag, short sensor sentence
    assert_eq!(summary.bad_packets, 3);
    assert_eq!(summary.time_zero, Some(1000.0));
    assert_eq!(summary.position_packets, 2);
    assert_eq!(summary.rate_packets, 1);
    assert_eq!(summary.sensor_packets, 4);
    assert_eq!(summary.health_packets, 1);
    assert_eq!(summary.to_string(), "processed 12 packets, 3 bad (75.00% success)");

    let channels = &output.channels;
    assert_eq!(
        channels.gps_fix.to_csv_string().unwrap(),
        "time,lat,long\n2.5,44.056789,-123.086754\n"
    );
    assert_eq!(
        channels.angles.to_csv_string().unwrap(),
        "time,pitch_angle,roll_angle,yaw_angle\n1,-1.5,2.25,90\n2.5,-1,2,91\n"
    );
    assert_eq!(
        channels.gps_velocity.to_csv_string().unwrap(),
        "time,vel_east,vel_west\n3.25,0.25,-0.75\n"
    );
    assert_eq!(
        channels.angular_rates.to_csv_string().unwrap(),
        "time,pitch_rate,roll_rate,yaw_rate\n3.25,0.1,0.2,0.3\n"
    );
    assert_eq!(
        channels.gyroscope.to_csv_string().unwrap(),
        "time,x_gyro,y_gyro,z_gyro\n4,0.4,0.5,0.6\n"
    );
    assert_eq!(
        channels.accelerometer.to_csv_string().unwrap(),
        "time,x_accel,y_accel,z_accel\n4.5,0.01,-0.02,9.81\n"
    );
    assert_eq!(
        channels.magnetometer.to_csv_string().unwrap(),
        "time,x_magnetometer,y_magnetometer,z_magnetometer\n5,0.3,0.4,0.5\n"
    );
}

#[test]
fn test_total_packets_equals_line_count() {
    let lines = vec![
        String::new(),
        "garbage".to_string(),
        ",*".to_string(),
        "$,*0".to_string(),
        sentence("$PCHRS,0,1,2,3,4"),
        sentence("$PCHRS,0,2,2,3,4"),
        sentence("$UNKNOWN"),
        "*".repeat(40),
    ];
    let output = Decoder::new().decode_lines(&lines);
    assert_eq!(output.summary.total_packets, lines.len());
}

#[test]
fn test_corrupted_byte_is_rejected() {
    let good = sentence("$PCHRS,0,1005,0.4,0.5,0.6");
    let corrupted = good.replacen("0.5", "0.7", 1);
    let lines = vec![sentence("$PCHRS,0,1000,0.1,0.2,0.3"), corrupted];

    let output = Decoder::new().decode_lines(&lines);
    assert_eq!(output.summary.bad_packets, 1);
    assert_eq!(output.channels.record_count(), 0);
}

#[test]
fn test_rebasing_survives_interleaved_corruption() {
    let lines = vec![
        sentence("$PCHRS,1,250.5,0,0,1"),
        "$PCHRS,1,251,0,0,1,*FF".to_string(),
        "noise".to_string(),
        sentence("$PCHRS,1,252.75,0,0,1"),
        "$PCHRS,1,2".to_string(),
        sentence("$PCHRS,1,260.5,0,0,1"),
    ];

    let output = Decoder::new().decode_lines(&lines);
    let times: Vec<f64> = output
        .channels
        .accelerometer
        .records()
        .iter()
        .map(|r| r.time)
        .collect();
    assert_eq!(times, vec![2.25, 10.0]);
    assert_eq!(output.summary.bad_packets, 3);
}

#[test]
fn test_unrecognized_first_sentence_sets_time_zero() {
    let lines = vec![sentence("$GPGGA,500,1,2"), sentence("$PCHRS,0,505,1,2,3")];
    let output = Decoder::new().decode_lines(&lines);

    assert_eq!(output.summary.time_zero, Some(500.0));
    assert_eq!(output.summary.bad_packets, 0);
    assert_eq!(output.channels.gyroscope.records()[0].time, 5.0);
}

#[test]
fn test_zero_native_time_is_a_reference() {
    let lines = vec![
        sentence("$PCHRS,0,0,1,2,3"),
        sentence("$PCHRS,0,0.5,1,2,3"),
        sentence("$PCHRS,0,12,1,2,3"),
    ];
    let output = Decoder::new().decode_lines(&lines);

    assert_eq!(output.summary.time_zero, Some(0.0));
    let rows: Vec<Vec<String>> = output.channels.gyroscope.rows().collect();
    assert_eq!(rows[0][0], "0.5");
    assert_eq!(rows[1][0], "12");
}

#[test]
fn test_non_finite_times_are_bad_packets() {
    let lines = vec![
        sentence("$PCHRS,0,NaN,1,2,3"),
        sentence("$PCHRS,0,1000,1,2,3"),
        sentence("$PCHRS,0,1005,1,2,3"),
        sentence("$PCHRS,0,inf,1,2,3"),
        sentence("$PCHRG,infinity,44.0,-123.0,0.0,1,2,3"),
    ];
    let output = Decoder::new().decode_lines(&lines);

    // The NaN line cannot be the reference, so the next one is
    assert_eq!(output.summary.time_zero, Some(1000.0));
    assert_eq!(output.summary.bad_packets, 3);
    let rows: Vec<Vec<String>> = output.channels.gyroscope.rows().collect();
    assert_eq!(rows, vec![vec!["5", "1", "2", "3"]]);
    assert_eq!(output.channels.len_of(Channel::Angles), 0);
}

#[test]
fn test_field_count_thresholds() {
    let lines = vec![
        sentence("$PCHRS,0,1000,0,0,0"),
        // one data field short of the minimum for each kind
        sentence("$PCHRG,1001,44.0,-123.0,0.0,1,2"),
        sentence("$PCHRR,1002,0.25,-0.75,0.0,0.1,0.2"),
        sentence("$PCHRS,0,1003,0.4,0.5"),
        // exactly at the minimum
        sentence("$PCHRG,1004,44.0,-123.0,0.0,1,2,3"),
        sentence("$PCHRR,1005,0.25,-0.75,0.0,0.1,0.2,0.3"),
        sentence("$PCHRS,0,1006,0.4,0.5,0.6"),
    ];
    let output = Decoder::new().decode_lines(&lines);

    assert_eq!(output.summary.bad_packets, 3);
    assert_eq!(output.channels.gps_fix.records()[0].time, 4.0);
    assert_eq!(output.channels.gps_velocity.records()[0].time, 5.0);
    let rows: Vec<Vec<String>> = output.channels.gyroscope.rows().collect();
    assert_eq!(rows, vec![vec!["6", "0.4", "0.5", "0.6"]]);
}

#[test]
fn test_unknown_sensor_id_is_not_bad() {
    let lines = vec![sentence("$PCHRS,0,1,0,0,0"), sentence("$PCHRS,3,2,1,2,3")];
    let output = Decoder::new().decode_lines(&lines);
    assert_eq!(output.summary.bad_packets, 0);
    assert_eq!(output.channels.record_count(), 0);
}

#[test]
fn test_decoding_is_idempotent() {
    let decoder = Decoder::new();
    let first = decoder.decode_lines(ride_log());
    let second = decoder.decode_lines(ride_log());
    assert_eq!(first, second);

    for channel in Channel::ALL {
        let mut a = Vec::new();
        let mut b = Vec::new();
        first.channels.write_csv(channel, &mut a).unwrap();
        second.channels.write_csv(channel, &mut b).unwrap();
        assert_eq!(a, b, "channel {} differs", channel);
    }
}

#[test]
fn test_decode_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in ride_log() {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();

    let reader = BufReader::new(File::open(file.path()).unwrap());
    let from_file = Decoder::new().decode_reader(reader).unwrap();
    assert_eq!(from_file, Decoder::new().decode_lines(ride_log()));
}

#[test]
fn test_concatenated_sentences_with_corrected_labels() {
    let line = format!(
        "{}{}{}",
        sentence("$PCHRS,0,1000,0.1,0.2,0.3"),
        sentence("$PCHRR,1002,1.5,-2.5,0.0,0.1,0.2,0.3"),
        sentence("$PCHRS,2,1003,0.3,0.4,0.5")
    );
    let config = DecoderConfig::new()
        .with_split_concatenated(true)
        .with_velocity_labels(VelocityLabels::NorthEast);
    let output = Decoder::with_config(config).unwrap().decode_str(&line);

    assert_eq!(output.summary.total_packets, 3);
    assert_eq!(output.summary.bad_packets, 0);
    assert_eq!(
        output.channels.gps_velocity.to_csv_string().unwrap(),
        "time,vel_north,vel_east\n2,1.5,-2.5\n"
    );
    assert_eq!(output.channels.magnetometer.len(), 1);
}
