//! Embedded country tables.
//!
//! Every table is sorted by name so lookups can binary search.

use foundation::math::GeoPoint;

/// Built-in fallback coordinates. Russia is anchored at Moscow.
pub const COUNTRY_DATA: &[(&str, GeoPoint)] = &[
    ("Afghanistan", GeoPoint::new(33.9391, 67.7100)),
    ("Albania", GeoPoint::new(41.1533, 20.1683)),
    ("Algeria", GeoPoint::new(28.0339, 1.6596)),
    ("Andorra", GeoPoint::new(42.5063, 1.5218)),
    ("Argentina", GeoPoint::new(-38.4161, -63.6167)),
    ("Armenia", GeoPoint::new(40.0691, 45.0382)),
    ("Australia", GeoPoint::new(-25.2744, 133.7751)),
    ("Austria", GeoPoint::new(47.5162, 14.5501)),
    ("Azerbaijan", GeoPoint::new(40.1431, 47.5769)),
    ("Bahrain", GeoPoint::new(25.9304, 50.6378)),
    ("Bangladesh", GeoPoint::new(23.6850, 90.3563)),
    ("Belarus", GeoPoint::new(53.7098, 27.9534)),
    ("Belgium", GeoPoint::new(50.5039, 4.4699)),
    ("Bolivia", GeoPoint::new(-16.2902, -63.5887)),
    ("Bosnia and Herzegovina", GeoPoint::new(43.9159, 17.6791)),
    ("Brazil", GeoPoint::new(-14.2350, -51.9253)),
    ("Bulgaria", GeoPoint::new(42.7339, 25.4858)),
    ("Cambodia", GeoPoint::new(12.5657, 104.9910)),
    ("Canada", GeoPoint::new(56.1304, -106.3468)),
    ("Chile", GeoPoint::new(-35.6751, -71.5430)),
    ("China", GeoPoint::new(35.8617, 104.1954)),
    ("Colombia", GeoPoint::new(4.5709, -74.2973)),
    ("Croatia", GeoPoint::new(45.1000, 15.2000)),
    ("Cyprus", GeoPoint::new(35.1264, 33.4299)),
    ("Czech Republic", GeoPoint::new(49.8175, 15.4730)),
    ("Denmark", GeoPoint::new(56.2639, 9.5018)),
    ("Ecuador", GeoPoint::new(-1.8312, -78.1834)),
    ("Egypt", GeoPoint::new(26.0975, 30.0444)),
    ("Estonia", GeoPoint::new(58.5953, 25.0136)),
    ("Finland", GeoPoint::new(61.9241, 25.7482)),
    ("France", GeoPoint::new(46.6034, 1.8883)),
    ("Georgia", GeoPoint::new(42.3154, 43.3569)),
    ("Germany", GeoPoint::new(51.1657, 10.4515)),
    ("Ghana", GeoPoint::new(7.9465, -1.0232)),
    ("Greece", GeoPoint::new(39.0742, 21.8243)),
    ("Hungary", GeoPoint::new(47.1625, 19.5033)),
    ("Iceland", GeoPoint::new(64.9631, -19.0208)),
    ("India", GeoPoint::new(20.5937, 78.9629)),
    ("Indonesia", GeoPoint::new(-0.7893, 113.9213)),
    ("Iran", GeoPoint::new(32.4279, 53.6880)),
    ("Iraq", GeoPoint::new(33.2232, 43.6793)),
    ("Ireland", GeoPoint::new(53.1424, -7.6921)),
    ("Israel", GeoPoint::new(31.0461, 34.8516)),
    ("Italy", GeoPoint::new(41.8719, 12.5674)),
    ("Japan", GeoPoint::new(36.2048, 138.2529)),
    ("Jordan", GeoPoint::new(30.5852, 36.2384)),
    ("Kazakhstan", GeoPoint::new(48.0196, 66.9237)),
    ("Kenya", GeoPoint::new(-0.0236, 37.9062)),
    ("Kuwait", GeoPoint::new(29.3117, 47.4818)),
    ("Kyrgyzstan", GeoPoint::new(41.2044, 74.7661)),
    ("Latvia", GeoPoint::new(56.8796, 24.6032)),
    ("Lebanon", GeoPoint::new(33.8547, 35.8623)),
    ("Liechtenstein", GeoPoint::new(47.1660, 9.5554)),
    ("Lithuania", GeoPoint::new(55.1694, 23.8813)),
    ("Luxembourg", GeoPoint::new(49.8153, 6.1296)),
    ("Malaysia", GeoPoint::new(4.2105, 101.9758)),
    ("Malta", GeoPoint::new(35.9375, 14.3754)),
    ("Mexico", GeoPoint::new(23.6345, -102.5528)),
    ("Moldova", GeoPoint::new(47.4116, 28.3699)),
    ("Monaco", GeoPoint::new(43.7384, 7.4246)),
    ("Mongolia", GeoPoint::new(46.8625, 103.8467)),
    ("Montenegro", GeoPoint::new(42.7087, 19.3744)),
    ("Morocco", GeoPoint::new(31.7917, -7.0926)),
    ("Netherlands", GeoPoint::new(52.1326, 5.2913)),
    ("New Zealand", GeoPoint::new(-40.9006, 174.8860)),
    ("Nigeria", GeoPoint::new(9.0820, 8.6753)),
    ("North Macedonia", GeoPoint::new(41.6086, 21.7453)),
    ("Norway", GeoPoint::new(60.4720, 8.4689)),
    ("Pakistan", GeoPoint::new(30.3753, 69.3451)),
    ("Peru", GeoPoint::new(-9.1900, -75.0152)),
    ("Philippines", GeoPoint::new(12.8797, 121.7740)),
    ("Poland", GeoPoint::new(51.9194, 19.1451)),
    ("Portugal", GeoPoint::new(39.3999, -8.2245)),
    ("Qatar", GeoPoint::new(25.3548, 51.1839)),
    ("Romania", GeoPoint::new(45.9432, 24.9668)),
    ("Russia", GeoPoint::new(55.7558, 37.6173)),
    ("San Marino", GeoPoint::new(43.9424, 12.4578)),
    ("Saudi Arabia", GeoPoint::new(23.8859, 45.0792)),
    ("Serbia", GeoPoint::new(44.0165, 21.0059)),
    ("Singapore", GeoPoint::new(1.3521, 103.8198)),
    ("Slovakia", GeoPoint::new(48.6690, 19.6990)),
    ("Slovenia", GeoPoint::new(46.1512, 14.9955)),
    ("South Africa", GeoPoint::new(-30.5595, 22.9375)),
    ("South Korea", GeoPoint::new(35.9078, 127.7669)),
    ("Spain", GeoPoint::new(40.4637, -3.7492)),
    ("Sweden", GeoPoint::new(60.1282, 18.6435)),
    ("Switzerland", GeoPoint::new(46.8182, 8.2275)),
    ("Syria", GeoPoint::new(34.8021, 38.9968)),
    ("Taiwan", GeoPoint::new(23.6978, 120.9605)),
    ("Thailand", GeoPoint::new(15.8700, 100.9925)),
    ("Turkey", GeoPoint::new(38.9637, 35.2433)),
    ("Ukraine", GeoPoint::new(48.3794, 31.1656)),
    ("United Arab Emirates", GeoPoint::new(23.4241, 53.8478)),
    ("United Kingdom", GeoPoint::new(55.3781, -3.4360)),
    ("United States", GeoPoint::new(37.0902, -95.7129)),
    ("Uruguay", GeoPoint::new(-32.5228, -55.7658)),
    ("Uzbekistan", GeoPoint::new(41.3775, 64.5853)),
    ("Vatican City", GeoPoint::new(41.9029, 12.4534)),
    ("Venezuela", GeoPoint::new(6.4238, -66.5897)),
    ("Vietnam", GeoPoint::new(14.0583, 108.2772)),
    ("Yemen", GeoPoint::new(15.5527, 48.5164)),
];

const FLAGS: &[(&str, &str)] = &[
    ("Afghanistan", "🇦🇫"),
    ("Albania", "🇦🇱"),
    ("Algeria", "🇩🇿"),
    ("Andorra", "🇦🇩"),
    ("Argentina", "🇦🇷"),
    ("Armenia", "🇦🇲"),
    ("Australia", "🇦🇺"),
    ("Austria", "🇦🇹"),
    ("Azerbaijan", "🇦🇿"),
    ("Bahrain", "🇧🇭"),
    ("Bangladesh", "🇧🇩"),
    ("Belarus", "🇧🇾"),
    ("Belgium", "🇧🇪"),
    ("Bolivia", "🇧🇴"),
    ("Bosnia and Herzegovina", "🇧🇦"),
    ("Brazil", "🇧🇷"),
    ("Bulgaria", "🇧🇬"),
    ("Cambodia", "🇰🇭"),
    ("Canada", "🇨🇦"),
    ("Chile", "🇨🇱"),
    ("China", "🇨🇳"),
    ("Colombia", "🇨🇴"),
    ("Croatia", "🇭🇷"),
    ("Cyprus", "🇨🇾"),
    ("Czech Republic", "🇨🇿"),
    ("Denmark", "🇩🇰"),
    ("Ecuador", "🇪🇨"),
    ("Egypt", "🇪🇬"),
    ("Estonia", "🇪🇪"),
    ("Finland", "🇫🇮"),
    ("France", "🇫🇷"),
    ("Georgia", "🇬🇪"),
    ("Germany", "🇩🇪"),
    ("Ghana", "🇬🇭"),
    ("Greece", "🇬🇷"),
    ("Hungary", "🇭🇺"),
    ("Iceland", "🇮🇸"),
    ("India", "🇮🇳"),
    ("Indonesia", "🇮🇩"),
    ("Iran", "🇮🇷"),
    ("Iraq", "🇮🇶"),
    ("Ireland", "🇮🇪"),
    ("Israel", "🇮🇱"),
    ("Italy", "🇮🇹"),
    ("Japan", "🇯🇵"),
    ("Jordan", "🇯🇴"),
    ("Kazakhstan", "🇰🇿"),
    ("Kenya", "🇰🇪"),
    ("Kuwait", "🇰🇼"),
    ("Kyrgyzstan", "🇰🇬"),
    ("Latvia", "🇱🇻"),
    ("Lebanon", "🇱🇧"),
    ("Liechtenstein", "🇱🇮"),
    ("Lithuania", "🇱🇹"),
    ("Luxembourg", "🇱🇺"),
    ("Malaysia", "🇲🇾"),
    ("Malta", "🇲🇹"),
    ("Mexico", "🇲🇽"),
    ("Moldova", "🇲🇩"),
    ("Monaco", "🇲🇨"),
    ("Mongolia", "🇲🇳"),
    ("Montenegro", "🇲🇪"),
    ("Morocco", "🇲🇦"),
    ("Netherlands", "🇳🇱"),
    ("New Zealand", "🇳🇿"),
    ("Nigeria", "🇳🇬"),
    ("North Macedonia", "🇲🇰"),
    ("Norway", "🇳🇴"),
    ("Pakistan", "🇵🇰"),
    ("Peru", "🇵🇪"),
    ("Philippines", "🇵🇭"),
    ("Poland", "🇵🇱"),
    ("Portugal", "🇵🇹"),
    ("Qatar", "🇶🇦"),
    ("Romania", "🇷🇴"),
    ("Russia", "🇷🇺"),
    ("San Marino", "🇸🇲"),
    ("Saudi Arabia", "🇸🇦"),
    ("Serbia", "🇷🇸"),
    ("Singapore", "🇸🇬"),
    ("Slovakia", "🇸🇰"),
    ("Slovenia", "🇸🇮"),
    ("South Africa", "🇿🇦"),
    ("South Korea", "🇰🇷"),
    ("Spain", "🇪🇸"),
    ("Sweden", "🇸🇪"),
    ("Switzerland", "🇨🇭"),
    ("Syria", "🇸🇾"),
    ("Taiwan", "🇹🇼"),
    ("Thailand", "🇹🇭"),
    ("Turkey", "🇹🇷"),
    ("Ukraine", "🇺🇦"),
    ("United Arab Emirates", "🇦🇪"),
    ("United Kingdom", "🇬🇧"),
    ("United States", "🇺🇸"),
    ("Uruguay", "🇺🇾"),
    ("Uzbekistan", "🇺🇿"),
    ("Vatican City", "🇻🇦"),
    ("Venezuela", "🇻🇪"),
    ("Vietnam", "🇻🇳"),
    ("Yemen", "🇾🇪"),
];

pub const DEFAULT_FLAG: &str = "\u{1f30d}";

/// Coordinates from the embedded table.
pub fn embedded_coords(name: &str) -> Option<GeoPoint> {
    COUNTRY_DATA
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .map(|i| COUNTRY_DATA[i].1)
}

pub fn embedded_names() -> impl Iterator<Item = &'static str> {
    COUNTRY_DATA.iter().map(|(n, _)| *n)
}

pub fn flag(name: &str) -> &'static str {
    FLAGS
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .map(|i| FLAGS[i].1)
        .unwrap_or(DEFAULT_FLAG)
}
