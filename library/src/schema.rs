table! {
    devices (id) {
        id -> Integer,
        mac -> Text,
        nickname -> Nullable<Text>,
        danger_threshold -> Nullable<Double>,
        created_at -> Timestamp,
    }
}

table! {
    readings (id) {
        id -> Integer,
        device_id -> Integer,
        reading -> Double,
        created_at -> Timestamp,
    }
}

joinable!(readings -> devices (device_id));

allow_tables_to_appear_in_same_query!(devices, readings);
