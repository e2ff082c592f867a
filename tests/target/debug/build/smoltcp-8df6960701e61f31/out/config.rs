pub const IFACE_MAX_SIXLOWPAN_ADDRESS_CONTEXT_COUNT: usize = 4;
pub const ASSEMBLER_MAX_SEGMENT_COUNT: usize = 4;
pub const IFACE_MAX_MULTICAST_GROUP_COUNT: usize = 4;
pub const REASSEMBLY_BUFFER_SIZE: usize = 1500;
pub const RPL_RELATIONS_BUFFER_COUNT: usize = 16;
pub const IPV6_HBH_MAX_OPTIONS: usize = 4;
pub const DNS_MAX_SERVER_COUNT: usize = 1;
pub const DNS_MAX_NAME_SIZE: usize = 255;
pub const FRAGMENTATION_BUFFER_SIZE: usize = 1500;
pub const DNS_MAX_RESULT_COUNT: usize = 1;
pub const RPL_PARENTS_BUFFER_COUNT: usize = 8;
pub const IFACE_MAX_ADDR_COUNT: usize = 2;
pub const REASSEMBLY_BUFFER_COUNT: usize = 1;
pub const IFACE_NEIGHBOR_CACHE_COUNT: usize = 8;
pub const IFACE_MAX_ROUTE_COUNT: usize = 2;
